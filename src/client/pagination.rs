//! Automatic pagination
//!
//! `params.paginate == true`일 때 어댑터가 목록 엔드포인트를 반복 호출한다.
//! 페이지는 받은 순서대로 이어 붙인다.

use std::future::Future;

use crate::errors::CcxtResult;
use crate::types::Params;

/// 한 페이지 결과
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 다음 페이지 커서 (없거나 비면 마지막 페이지)
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// 커서 없는 마지막 페이지
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

/// `paginate` 라우팅 키를 꺼내고 나머지 파라미터를 돌려준다
pub fn take_paginate(params: &Params) -> (bool, Params) {
    let mut rest = params.clone();
    let paginate = rest
        .remove("paginate")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    (paginate, rest)
}

/// 커서 기반 페이지네이션
///
/// 커서가 없거나 비었거나 `max_pages`에 도달하면 멈춘다.
pub async fn paginate_cursor<T, F, Fut>(max_pages: u32, mut fetch: F) -> CcxtResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = CcxtResult<Page<T>>>,
{
    let mut results = Vec::new();
    let mut cursor: Option<String> = None;
    for page_number in 0..max_pages.max(1) {
        let page = fetch(cursor.take()).await?;
        tracing::trace!(page = page_number, items = page.items.len(), "cursor page");
        results.extend(page.items);
        match page.next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }
    Ok(results)
}

/// 오프셋 기반 페이지네이션
///
/// 페이지가 `page_size`보다 짧으면 마지막 페이지로 본다.
pub async fn paginate_offset<T, F, Fut>(
    max_pages: u32,
    page_size: u32,
    mut fetch: F,
) -> CcxtResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = CcxtResult<Vec<T>>>,
{
    let mut results = Vec::new();
    let mut offset = 0u32;
    for _ in 0..max_pages.max(1) {
        let items = fetch(offset).await?;
        let count = items.len() as u32;
        results.extend(items);
        if count < page_size || count == 0 {
            break;
        }
        offset += count;
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_cursor_pages_concatenate_in_order() {
        let pages = vec![
            Page::new(vec![1, 2], Some("c1".to_string())),
            Page::new(vec![3], Some("c2".to_string())),
            Page::new(vec![4, 5], Some(String::new())),
        ];
        let mut seen = Vec::new();
        let mut iter = pages.into_iter();
        let result = paginate_cursor(10, |cursor| {
            seen.push(cursor);
            let page = iter.next().unwrap_or_else(|| Page::last(vec![]));
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(result, vec![1, 2, 3, 4, 5]);
        assert_eq!(seen, vec![None, Some("c1".into()), Some("c2".into())]);
    }

    #[tokio::test]
    async fn test_cursor_stops_at_max_pages() {
        let mut calls = 0;
        let result = paginate_cursor(3, |_| {
            calls += 1;
            async { Ok(Page::new(vec!['x'], Some("more".to_string()))) }
        })
        .await
        .unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_offset_stops_on_short_page() {
        let mut offsets = Vec::new();
        let result = paginate_offset(10, 2, |offset| {
            offsets.push(offset);
            let items: Vec<u32> = match offset {
                0 => vec![1, 2],
                2 => vec![3, 4],
                _ => vec![5],
            };
            async move { Ok(items) }
        })
        .await
        .unwrap();
        assert_eq!(result, vec![1, 2, 3, 4, 5]);
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[test]
    fn test_take_paginate() {
        let params = json!({ "paginate": true, "limit": 5 })
            .as_object()
            .cloned()
            .unwrap();
        let (paginate, rest) = take_paginate(&params);
        assert!(paginate);
        assert!(!rest.contains_key("paginate"));
        assert_eq!(rest.len(), 1);
    }
}
