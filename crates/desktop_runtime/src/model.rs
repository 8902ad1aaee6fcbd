use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use desktop_app_chat::ChatState;
use desktop_app_games::{DoodleState, GamesState, RpsScore, RpsState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::window_manager::WindowManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "win-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppKind {
    Chat,
    Games,
    Profile,
}

impl AppKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Chat => "Messages",
            Self::Games => "Mini Games",
            Self::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

/// Render-facing view of one open window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowHandle {
    pub id: WindowId,
    pub app_kind: AppKind,
    pub title: String,
    pub position: WindowPosition,
    pub z_order: u32,
    pub is_focused: bool,
}

/// State of a profile window. Empty: the profile itself lives in the session's
/// [`ProfileStore`](crate::profile::ProfileStore).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileViewState;

/// Application state owned by exactly one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppState {
    Chat(ChatState),
    Games(GamesState),
    Profile(ProfileViewState),
}

impl AppState {
    pub fn empty_for(app_kind: AppKind) -> Self {
        match app_kind {
            AppKind::Chat => Self::Chat(ChatState::default()),
            AppKind::Games => Self::Games(GamesState::default()),
            AppKind::Profile => Self::Profile(ProfileViewState),
        }
    }

    pub fn app_kind(&self) -> AppKind {
        match self {
            Self::Chat(_) => AppKind::Chat,
            Self::Games(_) => AppKind::Games,
            Self::Profile(_) => AppKind::Profile,
        }
    }

    pub fn as_chat(&self) -> Option<&ChatState> {
        match self {
            Self::Chat(chat) => Some(chat),
            _ => None,
        }
    }

    pub fn as_games(&self) -> Option<&GamesState> {
        match self {
            Self::Games(games) => Some(games),
            _ => None,
        }
    }

    pub fn rps(&self) -> Option<&RpsState> {
        self.as_games().map(|games| &games.rps)
    }

    pub fn doodle(&self) -> Option<&DoodleState> {
        self.as_games().map(|games| &games.doodle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub position: WindowPosition,
    pub z_order: u32,
    pub is_focused: bool,
    pub app_state: AppState,
}

impl WindowRecord {
    pub fn app_kind(&self) -> AppKind {
        self.app_state.app_kind()
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle {
            id: self.id,
            app_kind: self.app_kind(),
            title: self.title.clone(),
            position: self.position,
            z_order: self.z_order,
            is_focused: self.is_focused,
        }
    }
}

/// Reference to an avatar image, typically a `data:` URL produced by the capture flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarRef(String);

impl AvatarRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Encodes captured image bytes as a `data:<mime>;base64,...` URL.
    pub fn from_image_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "data:{mime_type};base64,{}",
            BASE64_STANDARD.encode(bytes)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("`{0}` is not an IANA timezone identifier")]
    InvalidTimezone(String),
}

/// Onboarded identity. Stored records go through the same validation as onboarding input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredUserProfile")]
pub struct UserProfile {
    name: String,
    timezone: String,
    avatar: Option<AvatarRef>,
}

impl UserProfile {
    /// Validates onboarding input. A blank timezone falls back to [`DEFAULT_TIMEZONE`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] when the name is blank or the timezone is not zone-shaped.
    pub fn new(name: &str, timezone: &str) -> Result<Self, ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let timezone = match timezone.trim() {
            "" => DEFAULT_TIMEZONE,
            zone if is_iana_zone_shaped(zone) => zone,
            other => return Err(ProfileError::InvalidTimezone(other.to_string())),
        };
        Ok(Self {
            name: name.to_string(),
            timezone: timezone.to_string(),
            avatar: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn avatar(&self) -> Option<&AvatarRef> {
        self.avatar.as_ref()
    }

    pub(crate) fn set_avatar(&mut self, avatar: AvatarRef) {
        self.avatar = Some(avatar);
    }
}

#[derive(Deserialize)]
struct StoredUserProfile {
    name: String,
    timezone: String,
    #[serde(default)]
    avatar: Option<AvatarRef>,
}

impl TryFrom<StoredUserProfile> for UserProfile {
    type Error = ProfileError;

    fn try_from(stored: StoredUserProfile) -> Result<Self, Self::Error> {
        let mut profile = Self::new(&stored.name, &stored.timezone)?;
        profile.avatar = stored.avatar;
        Ok(profile)
    }
}

fn is_iana_zone_shaped(zone: &str) -> bool {
    if zone.len() > 64 {
        return false;
    }
    let segments: Vec<&str> = zone.split('/').collect();
    segments.len() <= 3
        && segments.iter().all(|segment| {
            segment.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
        })
}

/// Everything one desktop session owns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesktopState {
    pub windows: WindowManager,
    pub profile: crate::profile::ProfileStore,
    /// Cumulative RPS score for the whole session; survives game windows closing.
    pub rps_score: RpsScore,
    /// Optional cap on concurrently open windows. `None` means unlimited.
    pub window_limit: Option<usize>,
}
