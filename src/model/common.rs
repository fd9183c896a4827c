/// Primary key type for every table (`SERIAL` in PostgreSQL).
pub type Id = i32;

/// Width of the `VARCHAR` text columns (`name`, `zip_code`).
pub const MAX_TEXT_LEN: usize = 100;

/// Whether `text` would overflow a `VARCHAR(MAX_TEXT_LEN)` column, counted in characters.
pub fn exceeds_text_column(text: &str) -> bool {
    text.chars().count() > MAX_TEXT_LEN
}
