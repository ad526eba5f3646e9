// src/view/pagination.rs

use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::models::sales::PaginationInfo;

/// Até este total todas as páginas aparecem; acima disso entra a janela com reticências.
const MAX_PLAIN_PAGES: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

// Número para páginas, "ellipsis" para as reticências
impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u32(*n),
            PageItem::Ellipsis => serializer.serialize_str("ellipsis"),
        }
    }
}

/// Botões numerados para a página `page` de `total_pages`. Uma página fora de
/// `[1, total_pages]` é trazida para dentro antes de montar a janela.
pub fn page_window(page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= MAX_PLAIN_PAGES {
        return (1..=total_pages).map(PageItem::Page).collect();
    }
    let page = page.clamp(1, total_pages);

    let mut items = vec![PageItem::Page(1)];
    if page > 3 {
        items.push(PageItem::Ellipsis);
    }

    let start = page.saturating_sub(1).max(2);
    let end = page.saturating_add(1).min(total_pages - 1);
    items.extend((start..=end).map(PageItem::Page));

    if page < total_pages - 2 {
        items.push(PageItem::Ellipsis);
    }
    if total_pages > 1 {
        items.push(PageItem::Page(total_pages));
    }
    items
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub current: u32,
    pub total_pages: u32,
    pub showing_from: u64,
    pub showing_to: u64,
    pub total_records: u64,
    pub summary: String,
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<PageItem>,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page: u32,
    pub next_page: u32,
}

impl PaginationView {
    /// `None` quando não há páginas: o controle não é exibido.
    pub fn build(info: &PaginationInfo) -> Option<PaginationView> {
        if info.total_pages == 0 {
            return None;
        }

        let page = info.page.max(1);
        let limit = u64::from(info.limit);
        let showing_from = u64::from(page - 1) * limit + 1;
        let showing_to = (u64::from(page) * limit).min(info.total_records);

        Some(PaginationView {
            current: page,
            total_pages: info.total_pages,
            showing_from,
            showing_to,
            total_records: info.total_records,
            summary: format!(
                "Showing {} to {} of {} results",
                showing_from, showing_to, info.total_records
            ),
            items: page_window(page, info.total_pages),
            has_previous: page > 1,
            has_next: page < info.total_pages,
            // o reducer faz o clamp; aqui só sugerimos o destino
            previous_page: page.saturating_sub(1).max(1),
            next_page: page.saturating_add(1).min(info.total_pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn small_totals_show_every_page() {
        assert_eq!(page_window(3, 5), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
        for p in 1..=3 {
            assert_eq!(page_window(p, 3), vec![Page(1), Page(2), Page(3)]);
        }
        assert_eq!(page_window(1, 7).len(), 7);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn out_of_range_page_is_pulled_into_the_window() {
        assert_eq!(page_window(u32::MAX, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(page_window(0, 10), page_window(1, 10));
        assert_eq!(page_window(40, 10), page_window(10, 10));

        let huge = page_window(u32::MAX, u32::MAX);
        assert_eq!(huge.first(), Some(&Page(1)));
        assert_eq!(huge.last(), Some(&Page(u32::MAX)));
    }

    #[test]
    fn middle_page_gets_a_window_with_two_ellipses() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn edges_drop_the_ellipsis_on_their_side() {
        assert_eq!(page_window(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert_eq!(page_window(3, 10), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]);
        assert_eq!(page_window(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
        assert_eq!(page_window(8, 10), vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]);
    }

    #[test]
    fn items_serialize_as_numbers_and_ellipsis_marker() {
        let json = serde_json::to_string(&page_window(5, 10)).unwrap();
        assert_eq!(json, r#"[1,"ellipsis",4,5,6,"ellipsis",10]"#);
    }

    #[test]
    fn control_summarises_the_visible_range() {
        let info = PaginationInfo { page: 3, limit: 10, total_pages: 3, total_records: 23 };
        let view = PaginationView::build(&info).unwrap();

        assert_eq!(view.summary, "Showing 21 to 23 of 23 results");
        assert!(view.has_previous);
        assert!(!view.has_next);
        assert_eq!(view.previous_page, 2);
        assert_eq!(view.next_page, 3);
    }

    #[test]
    fn control_is_hidden_without_pages() {
        assert_eq!(PaginationView::build(&PaginationInfo::default()), None);
    }
}
