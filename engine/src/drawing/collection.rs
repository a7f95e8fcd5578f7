// The persisted annotation set. Insertion order is z-order.
use shared::models::Drawing;

#[derive(Debug, Clone)]
pub struct DrawingCollection {
    items: Vec<Drawing>,
    visible: bool,
}

impl DrawingCollection {
    pub fn new() -> Self {
        Self { items: Vec::new(), visible: true }
    }

    pub fn add(&mut self, drawing: Drawing) {
        tracing::debug!(id = %drawing.id, kind = ?drawing.kind, "Drawing added");
        self.items.push(drawing);
    }

    pub fn remove(&mut self, id: &str) -> Option<Drawing> {
        let index = self.items.iter().position(|d| d.id == id)?;
        let removed = self.items.remove(index);
        tracing::debug!(id = %removed.id, kind = ?removed.kind, "Drawing removed");
        Some(removed)
    }

    /// Removes everything, returning how many drawings were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }

    pub fn get(&self, id: &str) -> Option<&Drawing> {
        self.items.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drawing> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Drawing] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

impl Default for DrawingCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a DrawingCollection {
    type Item = &'a Drawing;
    type IntoIter = std::slice::Iter<'a, Drawing>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DomainPoint, DrawingKind};

    fn drawing(id: &str) -> Drawing {
        Drawing {
            id: id.to_string(),
            kind: DrawingKind::Horizontal,
            points: vec![DomainPoint::new(0.0, 1.0)],
            color: None,
            label: None,
        }
    }

    #[test]
    fn test_add_remove_keeps_order() {
        let mut collection = DrawingCollection::new();
        for id in ["a", "b", "c"] {
            collection.add(drawing(id));
        }
        assert_eq!(collection.remove("b").map(|d| d.id), Some("b".to_string()));
        assert!(collection.remove("b").is_none());
        let ids: Vec<&str> = collection.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_clear_and_visibility() {
        let mut collection = DrawingCollection::new();
        collection.add(drawing("a"));
        assert!(collection.is_visible());
        assert!(!collection.toggle_visibility());
        assert_eq!(collection.clear(), 1);
        assert!(collection.is_empty());
        assert!(!collection.is_visible());
    }
}
