use crate::msg::{Key, Mouse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListAction {
    None,
    Moved,
    /// Click on the row that was already selected.
    Activate,
}

/// Selection within a list of `len` rows, shared by every list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ListCursor {
    index: usize,
}

impl ListCursor {
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set(&mut self, index: usize, len: usize) {
        self.index = index;
        self.clamp(len);
    }

    pub(crate) fn clamp(&mut self, len: usize) {
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }

    fn up(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn down(&mut self, len: usize) -> bool {
        if self.index + 1 >= len {
            return false;
        }
        self.index += 1;
        true
    }

    /// Arrow keys and `k`/`j`. Returns whether the key was a movement key.
    pub(crate) fn on_key(&mut self, key: Key, len: usize) -> bool {
        match key {
            Key::Up | Key::Char('k') => {
                self.up();
                true
            }
            Key::Down | Key::Char('j') => {
                self.down(len);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn on_mouse(&mut self, mouse: Mouse, len: usize) -> ListAction {
        let moved = match mouse {
            Mouse::WheelUp => self.up(),
            Mouse::WheelDown => self.down(len),
            Mouse::Click { row } if row >= len => false,
            Mouse::Click { row } if row == self.index => return ListAction::Activate,
            Mouse::Click { row } => {
                self.index = row;
                true
            }
        };
        if moved {
            ListAction::Moved
        } else {
            ListAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_move_within_bounds() {
        let mut cursor = ListCursor::default();
        assert!(cursor.on_key(Key::Up, 3));
        assert_eq!(cursor.index(), 0);
        cursor.on_key(Key::Char('j'), 3);
        cursor.on_key(Key::Down, 3);
        cursor.on_key(Key::Down, 3);
        assert_eq!(cursor.index(), 2);
        assert!(!cursor.on_key(Key::Enter, 3));
    }

    #[test]
    fn click_selects_then_activates() {
        let mut cursor = ListCursor::default();
        assert_eq!(cursor.on_mouse(Mouse::Click { row: 2 }, 4), ListAction::Moved);
        assert_eq!(cursor.on_mouse(Mouse::Click { row: 2 }, 4), ListAction::Activate);
        assert_eq!(cursor.on_mouse(Mouse::Click { row: 9 }, 4), ListAction::None);
        assert_eq!(cursor.on_mouse(Mouse::WheelUp, 4), ListAction::Moved);
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn clamp_follows_shrinking_lists() {
        let mut cursor = ListCursor::default();
        cursor.set(5, 10);
        cursor.clamp(3);
        assert_eq!(cursor.index(), 2);
        cursor.clamp(0);
        assert_eq!(cursor.index(), 0);
    }
}
