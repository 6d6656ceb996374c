/// Anything drawn as a named series.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

/// Stable reorder so highlighted series are drawn last.
///
/// Series not listed come first in their input order; listed series
/// follow in the order of `highlight_names`, the last one on top.
pub fn order_by_highlight<T: Named>(mut items: Vec<T>, highlight_names: &[String]) -> Vec<T> {
    if highlight_names.is_empty() {
        return items;
    }
    // `None < Some(_)` puts unlisted series first; sort_by_key is stable.
    items.sort_by_key(|item| highlight_names.iter().position(|h| h == item.name()));
    items
}
