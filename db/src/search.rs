use crate::PAGE_SIZE;

/// Filters `collection` by `query` against `property` and by `custom_filter`,
/// returning the total number of matches and the requested page of them.
///
/// Pages start at 1; page 0 is treated as the first page.
pub(crate) fn search<T, F>(
    collection: impl Iterator<Item = T>,
    property: F,
    page: usize,
    query: Option<&str>,
    custom_filter: impl Fn(&T) -> bool,
) -> (usize, Vec<T>)
where
    F: Fn(&T) -> String,
{
    let filter = contains_query(query, property);
    let mut total = 0;
    let mut skipped = 0;
    let mut results: Vec<T> = Vec::new();
    let to_skip = page.saturating_sub(1) * PAGE_SIZE;

    for row in collection {
        if !filter(&row) || !custom_filter(&row) {
            continue;
        }

        total += 1;

        if skipped < to_skip {
            skipped += 1;
        } else if results.len() < PAGE_SIZE {
            results.push(row);
        }
    }

    (total, results)
}

/// Exact lookup on `property`, ignoring case and accents. `None` when nothing
/// matches.
pub(crate) fn find_all<T, F>(
    collection: impl Iterator<Item = T>,
    property: F,
    value: &str,
) -> Option<Vec<T>>
where
    F: Fn(&T) -> String,
{
    let wanted = normalize(value);
    let found: Vec<T> = collection
        .filter(|row| normalize(&property(row)) == wanted)
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}

/// Returns a function to be used as a filter that checks if the provided query is contained in the
/// object string.
fn contains_query<T, F>(query: Option<&str>, property: F) -> impl Fn(&T) -> bool
where
    F: Fn(&T) -> String,
{
    let query = query.map(|d| truncate(d, 50)).map(normalize);

    move |object: &T| {
        if let Some(query) = &query {
            normalize(&property(object)).contains(query.as_str())
        } else {
            true
        }
    }
}

fn normalize(s: &str) -> String {
    unidecode::unidecode(s.trim()).to_ascii_lowercase()
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((idx, _)) => &s[..idx],
    }
}
