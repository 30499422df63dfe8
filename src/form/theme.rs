// src/form/theme.rs

use strum::IntoEnumIterator;

use crate::models::Theme;

/// Mutually exclusive theme choice.
#[derive(Debug, Clone, Default)]
pub struct ThemePicker {
    selected: Theme,
}

impl ThemePicker {
    pub fn selected(&self) -> Theme {
        self.selected
    }

    /// Marks `theme` as the only selected option and returns the previous one.
    pub fn select(&mut self, theme: Theme) -> Theme {
        std::mem::replace(&mut self.selected, theme)
    }

    /// Every option together with its selected flag, in display order.
    pub fn options(&self) -> impl Iterator<Item = (Theme, bool)> + '_ {
        Theme::iter().map(move |theme| (theme, theme == self.selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_minimal() {
        assert_eq!(ThemePicker::default().selected(), Theme::Minimal);
    }

    #[test]
    fn selecting_b_after_a_moves_the_single_highlight() {
        let mut picker = ThemePicker::default();
        picker.select(Theme::Modern);
        let previous = picker.select(Theme::Fancy);

        assert_eq!(previous, Theme::Modern);
        let marked: Vec<_> = picker.options().filter(|(_, on)| *on).collect();
        assert_eq!(marked, vec![(Theme::Fancy, true)]);
        assert!(picker.options().any(|(t, on)| t == Theme::Modern && !on));
    }
}
