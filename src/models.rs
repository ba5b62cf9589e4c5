use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EntrySnapshot {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub selftext: Option<String>,
}

/// What the server rendered: the entries and whether the page carries the
/// `#fav-display` indicator.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PageSnapshot {
    #[serde(default)]
    pub entries: Vec<EntrySnapshot>,
    #[serde(default)]
    pub fav_display: bool,
}

/// The 0/1 favorite flag as stored in the button's `favIntbool` data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavIntbool(u8);

impl FavIntbool {
    pub const NOT_FAVORITED: Self = Self(0);
    pub const FAVORITED: Self = Self(1);

    /// Loose equality with 1; every other value, missing included, is 0.
    pub fn parse(raw: Option<&str>) -> Self {
        let favorited = match raw.map(str::trim) {
            // jQuery's .data() turns "true" into a boolean, and true == 1
            Some("true") => true,
            Some(value) => value.parse::<f64>().map(|n| n == 1.0).unwrap_or(false),
            None => false,
        };
        Self::from(favorited)
    }

    pub fn is_favorited(self) -> bool {
        self.0 == 1
    }

    pub fn flipped(self) -> Self {
        Self(1 - self.0)
    }

    pub fn as_data(self) -> String {
        self.0.to_string()
    }
}

impl From<bool> for FavIntbool {
    fn from(favorited: bool) -> Self {
        if favorited {
            Self::FAVORITED
        } else {
            Self::NOT_FAVORITED
        }
    }
}

/// Form body of `POST {root}/entry/set-favorite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetFavoriteRequest {
    #[serde(rename = "entryId")]
    pub entry_id: String,
    /// The value before the click; the server flips it.
    #[serde(rename = "favIntbool")]
    pub fav_intbool: FavIntbool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SetFavoriteResponse {
    #[serde(default)]
    pub error: Option<String>,
}
