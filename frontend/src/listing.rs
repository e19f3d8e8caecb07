//! 列表辅助：客户端分页、搜索词过滤与机构范围

use news_desk_shared::{News, Role, User};

/// 页数 = ceil(n / size)，至少为 1
pub fn page_count(total: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    total.div_ceil(size).max(1)
}

/// 把页码限制在 `1..=page_count`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total, page_size))
}

/// 取出第 `page` 页（从 1 开始）的切片
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let page = clamp_page(page, items.len(), size);
    let start = (page - 1) * size;
    let end = (start + size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// 按搜索词过滤（不区分大小写，匹配标题与正文），搜索词从不发送给服务端
pub fn apply_search<'a>(items: &'a [News], term: Option<&str>) -> Vec<&'a News> {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => items.iter().filter(|n| n.matches_term(term)).collect(),
        None => items.iter().collect(),
    }
}

/// 机构新闻页的筛选范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgencyScope {
    /// 固定为某机构
    Fixed(i64),
    /// 管理员可选机构，`None` 表示全部
    Selectable(Option<i64>),
    /// 作者未绑定机构，不发起请求
    Unassigned,
    /// 无权访问
    Denied,
}

impl AgencyScope {
    pub fn for_viewer(user: &User, selected: Option<i64>) -> Self {
        match user.role {
            Role::Admin => AgencyScope::Selectable(selected),
            Role::Author => match user.agency_id {
                Some(id) => AgencyScope::Fixed(id),
                None => AgencyScope::Unassigned,
            },
            Role::Reader => AgencyScope::Denied,
        }
    }

    /// 用于 `agencyId` 查询参数的值；`None` 时调用方不应发起请求
    pub fn agency_filter(self) -> Option<Option<i64>> {
        match self {
            AgencyScope::Fixed(id) => Some(Some(id)),
            AgencyScope::Selectable(selected) => Some(selected),
            AgencyScope::Unassigned | AgencyScope::Denied => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::news;

    fn user(role: Role, agency_id: Option<i64>) -> User {
        User {
            id: 1,
            username: "u".to_string(),
            email: None,
            role,
            agency_id,
            agency: None,
        }
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(page_count(0, 9), 1);
        assert_eq!(page_count(9, 9), 1);
        assert_eq!(page_count(10, 9), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn slices_are_one_based_and_clamped() {
        let items: Vec<usize> = (1..=20).collect();
        assert_eq!(page_slice(&items, 1, 9), &items[0..9]);
        assert_eq!(page_slice(&items, 3, 9), &[19usize, 20][..]);
        assert_eq!(page_slice(&items, 0, 9), &items[0..9]);
        assert_eq!(page_slice(&items, 99, 9), &[19usize, 20][..]);
        assert!(page_slice::<usize>(&[], 1, 9).is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let items = vec![news(1, "Rust Weekly"), news(2, "Election night")];
        let found = apply_search(&items, Some("  rust "));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
        assert_eq!(apply_search(&items, Some("")).len(), 2);
        assert_eq!(apply_search(&items, None).len(), 2);
    }

    #[test]
    fn agency_scope_by_role() {
        assert_eq!(
            AgencyScope::for_viewer(&user(Role::Author, Some(5)), Some(9)),
            AgencyScope::Fixed(5)
        );
        assert_eq!(
            AgencyScope::for_viewer(&user(Role::Author, None), None).agency_filter(),
            None
        );
        assert_eq!(
            AgencyScope::for_viewer(&user(Role::Admin, None), Some(9)).agency_filter(),
            Some(Some(9))
        );
        assert_eq!(
            AgencyScope::for_viewer(&user(Role::Admin, None), None).agency_filter(),
            Some(None)
        );
        assert_eq!(
            AgencyScope::for_viewer(&user(Role::Reader, None), None),
            AgencyScope::Denied
        );
    }
}
