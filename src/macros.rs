//! Exchange Implementation Macros
//!
//! Provides macros to reduce boilerplate code in exchange descriptors.
//!
//! # Available Macros
//!
//! - [`timeframe_map!`] - Create timeframe HashMap with minimal syntax
//! - [`feature_flags!`] - Create ExchangeFeatures with enabled features listed
//! - [`api_urls!`] - Create API URL HashMap
//! - [`endpoint_costs!`] - Create rate-limit weight table
//! - [`exception_table!`] - Create exact/broad vendor error table
//! - [`require_credentials!`] - Fail closed on missing API key/secret

/// Creates a HashMap<Timeframe, String> with minimal syntax.
///
/// # Example
///
/// ```ignore
/// let timeframes = timeframe_map! {
///     Minute1 => "ONE_MINUTE",
///     Hour1 => "ONE_HOUR",
/// };
/// ```
#[macro_export]
macro_rules! timeframe_map {
    ($($variant:ident => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($crate::types::Timeframe::$variant, String::from($value));
        )*
        map
    }};
}

/// Creates ExchangeFeatures with only enabled features listed.
///
/// All unlisted features default to `false`.
#[macro_export]
macro_rules! feature_flags {
    ($($feature:ident),* $(,)?) => {{
        #[allow(clippy::needless_update)]
        $crate::types::ExchangeFeatures {
            $(
                $feature: true,
            )*
            ..Default::default()
        }
    }};
}

/// Creates an API URLs HashMap keyed by API family.
///
/// # Example
///
/// ```ignore
/// let api = api_urls! {
///     "v4public" => "https://whitebit.com/api/v4/public",
///     "v4private" => "https://whitebit.com/api/v4",
/// };
/// ```
#[macro_export]
macro_rules! api_urls {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map: std::collections::HashMap<String, String> = std::collections::HashMap::new();
        $(
            map.insert($key.into(), $value.into());
        )*
        map
    }};
}

/// Creates the endpoint weight table read by the rate limiter.
///
/// Keys are `"<api> <METHOD> <path>"`, matching [`crate::types::ExchangeDescriptor::cost`].
///
/// ```ignore
/// let costs = endpoint_costs! {
///     "v1private GET asset/history" => 60.0,
///     "v1private POST order" => 5.0,
/// };
/// ```
#[macro_export]
macro_rules! endpoint_costs {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map: std::collections::HashMap<String, f64> = std::collections::HashMap::new();
        $(
            map.insert(String::from($key), $value);
        )*
        map
    }};
}

/// Creates an [`ExceptionTable`](crate::errors::ExceptionTable).
///
/// Broad entries keep declaration order; the first substring hit wins.
///
/// ```ignore
/// let exceptions = exception_table! {
///     exact: {
///         "-1003" => RateLimitExceeded,
///     },
///     broad: {
///         "symbol must not be blank" => BadRequest,
///     },
/// };
/// ```
#[macro_export]
macro_rules! exception_table {
    (
        exact: { $($ek:expr => $ev:ident),* $(,)? },
        broad: { $($bk:expr => $bv:ident),* $(,)? } $(,)?
    ) => {{
        $crate::errors::ExceptionTable::new()
            $(.exact($ek, $crate::errors::ErrorKind::$ev))*
            $(.broad($bk, $crate::errors::ErrorKind::$bv))*
    }};
}

/// Helper macro to validate required credentials.
///
/// Returns AuthenticationError if credentials are missing.
///
/// # Example
///
/// ```ignore
/// let (api_key, secret) = require_credentials!(self.config, "woo")?;
/// ```
#[macro_export]
macro_rules! require_credentials {
    ($config:expr, $id:expr) => {{
        match ($config.api_key(), $config.secret()) {
            (Some(api_key), Some(secret)) if !api_key.is_empty() && !secret.is_empty() => {
                Ok::<_, $crate::errors::CcxtError>((api_key, secret))
            },
            (None, _) | (Some(""), _) => Err($crate::errors::CcxtError::AuthenticationError {
                message: format!("{} requires \"apiKey\" credential", $id),
            }),
            _ => Err($crate::errors::CcxtError::AuthenticationError {
                message: format!("{} requires \"secret\" credential", $id),
            }),
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::client::ExchangeConfig;
    use crate::errors::{CcxtError, ErrorKind, ExceptionTable};
    use crate::types::{ExchangeFeatures, Timeframe};
    use std::collections::HashMap;

    #[test]
    fn test_timeframe_map() {
        let timeframes: HashMap<Timeframe, String> = timeframe_map! {
            Minute1 => "ONE_MINUTE",
            Hour1 => "ONE_HOUR",
            Day1 => "ONE_DAY",
        };

        assert_eq!(
            timeframes.get(&Timeframe::Minute1).map(String::as_str),
            Some("ONE_MINUTE")
        );
        assert_eq!(timeframes.len(), 3);
    }

    #[test]
    fn test_feature_flags() {
        let features: ExchangeFeatures = feature_flags! {
            spot,
            fetch_markets,
            create_order,
        };

        assert!(features.spot);
        assert!(features.fetch_markets);
        assert!(features.create_order);
        // Unlisted features should be false
        assert!(!features.swap);
        assert!(!features.fetch_positions);
    }

    #[test]
    fn test_endpoint_costs() {
        let costs = endpoint_costs! {
            "v1private GET asset/history" => 60.0,
            "v3private GET positions" => 3.33,
        };
        assert_eq!(costs.get("v1private GET asset/history"), Some(&60.0));
    }

    #[test]
    fn test_exception_table_macro() {
        let table: ExceptionTable = exception_table! {
            exact: {
                "-1003" => RateLimitExceeded,
            },
            broad: {
                "symbol must not be blank" => BadRequest,
            },
        };
        assert_eq!(table.match_exact("-1003"), Some(ErrorKind::RateLimitExceeded));
        assert_eq!(
            table.match_broad("error: symbol must not be blank"),
            Some(ErrorKind::BadRequest)
        );
    }

    #[test]
    fn test_require_credentials_fails_closed() {
        let config = ExchangeConfig::new().with_api_key("key");
        let result = require_credentials!(config, "woo");
        match result {
            Err(CcxtError::AuthenticationError { message }) => {
                assert!(message.contains("secret"))
            },
            other => panic!("unexpected {other:?}"),
        }

        let config = ExchangeConfig::new().with_credentials("key", "secret");
        assert!(require_credentials!(config, "woo").is_ok());
    }
}
