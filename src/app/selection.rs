#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

#[derive(Debug, Default)]
pub(crate) struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub(crate) fn state(&self) -> &Selection {
        &self.state
    }

    pub(crate) fn selected_id(&self) -> Option<&str> {
        match &self.state {
            Selection::Selected(id) => Some(id.as_str()),
            Selection::Unselected => None,
        }
    }

    /// Click-to-select, click-again-to-deselect.
    pub(crate) fn select(&mut self, id: &str) -> &Selection {
        self.state = match &self.state {
            Selection::Selected(current) if current == id => Selection::Unselected,
            _ => Selection::Selected(id.to_string()),
        };
        &self.state
    }

    /// Returns whether something was selected.
    pub(crate) fn close(&mut self) -> bool {
        !matches!(
            std::mem::take(&mut self.state),
            Selection::Unselected
        )
    }
}
