use crate::dashboard::model::DashboardLayout;

/// Maximum number of undo steps kept.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo over whole-layout snapshots. Each builder transform records the
/// layout it replaced.
#[derive(Debug, Default, Clone)]
pub struct LayoutHistory {
    undo: Vec<DashboardLayout>,
    redo: Vec<DashboardLayout>,
}

impl LayoutHistory {
    pub fn record(&mut self, previous: DashboardLayout) {
        self.undo.push(previous);
        if self.undo.len() > MAX_HISTORY {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Swap `current` for the previous snapshot.
    pub fn undo(&mut self, current: &DashboardLayout) -> Option<DashboardLayout> {
        let prev = self.undo.pop()?;
        self.redo.push(current.clone());
        Some(prev)
    }

    pub fn redo(&mut self, current: &DashboardLayout) -> Option<DashboardLayout> {
        let next = self.redo.pop()?;
        self.undo.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> DashboardLayout {
        DashboardLayout::new("l", name)
    }

    #[test]
    fn undo_then_redo() {
        let mut history = LayoutHistory::default();
        history.record(named("a"));
        let current = named("b");
        let prev = history.undo(&current).unwrap();
        assert_eq!(prev.name, "a");
        let again = history.redo(&prev).unwrap();
        assert_eq!(again.name, "b");
    }

    #[test]
    fn record_clears_redo() {
        let mut history = LayoutHistory::default();
        history.record(named("a"));
        history.undo(&named("b"));
        assert!(history.can_redo());
        history.record(named("c"));
        assert!(!history.can_redo());
    }

    #[test]
    fn history_is_bounded() {
        let mut history = LayoutHistory::default();
        for i in 0..MAX_HISTORY + 10 {
            history.record(named(&i.to_string()));
        }
        let mut steps = 0;
        let mut current = named("top");
        while let Some(prev) = history.undo(&current) {
            current = prev;
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY);
        assert_eq!(current.name, "10");
    }
}
