//! Text rendering for diagnostics.
//!
//! Shortens `std::any::type_name` output, renders a type's declaring
//! levels and slot table, and picks "did you mean?" candidates from the
//! types a store actually holds.

/// Joins declaring levels, base first.
///
/// ```
/// use wirebox_support::rendering::render_levels;
///
/// let levels = ["game::Drawable", "game::Sprite"];
/// assert_eq!(render_levels(&levels), "Drawable → Sprite");
/// ```
pub fn render_levels(levels: &[impl AsRef<str>]) -> String {
    levels
        .iter()
        .map(|level| shorten_type_name(level.as_ref()))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One line of a slot table.
#[derive(Debug, Clone)]
pub struct SlotRow {
    /// Declaring level (short or full type name)
    pub level: String,
    pub name: String,
    /// Field or property, with setter visibility
    pub storage: String,
    /// Looked-up type
    pub value_type: String,
    /// `required` or `permit_missing`
    pub policy: String,
}

/// Renders slots as aligned columns.
///
/// ```text
/// Drawable  clock    field             Arc<Clock>  required
/// Sprite    texture  property (private) Arc<Texture> permit_missing
/// ```
pub fn render_slot_table(rows: &[SlotRow]) -> String {
    let level_w = column_width(rows, |r| r.level.as_str());
    let name_w = column_width(rows, |r| r.name.as_str());
    let storage_w = column_width(rows, |r| r.storage.as_str());
    let value_w = column_width(rows, |r| r.value_type.as_str());

    let mut out = String::new();
    for row in rows {
        let line = format!(
            "{:<level_w$}  {:<name_w$}  {:<storage_w$}  {:<value_w$}  {}",
            row.level, row.name, row.storage, row.value_type, row.policy,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn column_width(rows: &[SlotRow], cell: impl Fn(&SlotRow) -> &str) -> usize {
    rows.iter().map(|r| cell(r).chars().count()).max().unwrap_or(0)
}

/// Strips module paths from every path inside a type name.
///
/// ```
/// use wirebox_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("game::scene::Sprite"), "Sprite");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn game::clock::Clock>"),
///     "Arc<dyn Clock>"
/// );
/// assert_eq!(
///     shorten_type_name("core::option::Option<i32>"),
///     "Option<i32>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut chars = full_name.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// The innermost generic argument of a shortened name: `arc<texture>` → `texture`.
fn innermost(short: &str) -> &str {
    let start = short.rfind('<').map_or(0, |i| i + 1);
    short[start..].trim_end_matches('>')
}

/// Picks up to `max` names from `available` that resemble `requested`.
///
/// Whole-name containment ranks first, then containment of the short
/// names, then a shared prefix of three characters or more between the
/// innermost type names.
pub fn suggest_similar(requested: &str, available: &[&str], max: usize) -> Vec<String> {
    let requested_full = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let full = name.to_lowercase();
            let short = shorten_type_name(name).to_lowercase();

            if full.contains(&requested_full) || requested_full.contains(&full) {
                return Some((name, 100));
            }
            if short.contains(&requested_short) || requested_short.contains(&short) {
                return Some((name, 80));
            }

            let common = innermost(&short)
                .chars()
                .zip(innermost(&requested_short).chars())
                .take_while(|(a, b)| a == b)
                .count();
            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max)
        .map(|(name, _)| name.to_string())
        .collect()
}
