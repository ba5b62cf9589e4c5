use crate::dom::{Document, Element};
use crate::models::{EntrySnapshot, FavIntbool, PageSnapshot};

pub const ENTRY_CONTAINER: &str = "entry-container";
pub const ENTRY_TITLE: &str = "entry-container-title";
pub const ENTRY_EXPAND: &str = "entry-expand";
pub const SET_FAV_BTN: &str = "set-fav-btn";
pub const RIBBON: &str = "ribbon";
pub const HEART: &str = "fa-heart";
pub const FAV_DISPLAY_ID: &str = "fav-display";
pub const TEXT_TOGGLE: &str = "text-toggle";
pub const TEXT_CONTAINER: &str = "toggle-text-container";

pub const VISIBLE: &str = "gwa-visible";
pub const HIDDEN: &str = "gwa-hidden";
pub const SOLID: &str = "fas";
pub const HOLLOW: &str = "far";

pub const DATA_ENTRY_ID: &str = "entryId";
pub const DATA_FAV: &str = "favIntbool";

pub const TITLE_FAVORITE: &str = "Favorite audio!";
pub const TITLE_UNFAVORITE: &str = "Un-favorite audio!";

/// Builds the element tree the server would have rendered for `page`.
pub fn render_page(page: &PageSnapshot) -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    if page.fav_display {
        let display = doc.append(root, Element::new("span").with_id(FAV_DISPLAY_ID));
        // shows the action, so a favorited entry gets the hollow heart
        let favorited = page.entries.first().map(|e| e.favorite).unwrap_or(false);
        let glyph = if favorited { HOLLOW } else { SOLID };
        doc.append(display, Element::new("i").with_class(HEART).with_class(glyph));
    }

    for entry in &page.entries {
        render_entry(&mut doc, entry);
    }

    doc
}

fn render_entry(doc: &mut Document, entry: &EntrySnapshot) {
    let root = doc.root();
    let container = doc.append(root, Element::new("div").with_class(ENTRY_CONTAINER));

    let ribbon_state = if entry.favorite { VISIBLE } else { HIDDEN };
    doc.append(
        container,
        Element::new("div").with_class(RIBBON).with_class(ribbon_state),
    );

    doc.append(
        container,
        Element::new("div")
            .with_class(ENTRY_TITLE)
            .with_text(entry.title.clone()),
    );

    let (glyph, tooltip) = if entry.favorite {
        (SOLID, TITLE_UNFAVORITE)
    } else {
        (HOLLOW, TITLE_FAVORITE)
    };
    let button = doc.append(
        container,
        Element::new("a")
            .with_class(SET_FAV_BTN)
            .with_data(DATA_ENTRY_ID, entry.id.clone())
            .with_data(DATA_FAV, FavIntbool::from(entry.favorite).as_data())
            .with_title(tooltip),
    );
    doc.append(button, Element::new("i").with_class(HEART).with_class(glyph));

    let expand = doc.append(container, Element::new("div").with_class(ENTRY_EXPAND).hidden());
    if let Some(selftext) = &entry.selftext {
        doc.append(
            expand,
            Element::new("span")
                .with_class(TEXT_TOGGLE)
                .with_text(preview(selftext)),
        );
        doc.append(
            expand,
            Element::new("div")
                .with_class(TEXT_CONTAINER)
                .with_text(selftext.clone())
                .hidden(),
        );
    }
}

fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 80;
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
