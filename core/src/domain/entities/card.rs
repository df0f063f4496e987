//! Card-local loading states

/// Progress of a card's intro extract fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroState {
    Loading,
    Loaded(String),
    /// The fetch failed or came back empty. Rendered like `Loading`; there is no retry.
    Unavailable,
}

impl IntroState {
    pub fn text(&self) -> Option<&str> {
        match self {
            IntroState::Loaded(text) => Some(text),
            IntroState::Loading | IntroState::Unavailable => None,
        }
    }
}

/// Progress of a card's thumbnail load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded,
    /// Dismisses the placeholder the same way `Loaded` does
    Errored,
}

impl ImageState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ImageState::Pending)
    }
}

impl std::fmt::Display for ImageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageState::Pending => write!(f, "pending"),
            ImageState::Loaded => write!(f, "loaded"),
            ImageState::Errored => write!(f, "errored"),
        }
    }
}
