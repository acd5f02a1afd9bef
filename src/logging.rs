//! Structured logging
//!
//! tracing 기반 로깅 초기화. 어댑터는 요청마다 `debug!`, 매핑된 벤더 오류에
//! `warn!` 이벤트를 남긴다.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// 로그 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// 로그 설정
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `RUST_LOG`이 없을 때 쓰는 기본 레벨
    pub level: Level,
    pub format: LogFormat,
    pub show_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            show_target: true,
        }
    }
}

impl LogConfig {
    /// 요청 단위 디버그 로그까지 출력
    pub fn debug() -> Self {
        Self {
            level: Level::DEBUG,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
    }
}

/// 전역 subscriber 설치
///
/// 이미 설치돼 있으면 `false`를 돌려주고 아무것도 하지 않는다.
pub fn init_logging(config: LogConfig) -> bool {
    let builder = fmt()
        .with_env_filter(config.filter())
        .with_target(config.show_target);

    match config.format {
        LogFormat::Pretty => builder.try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
    }
}
