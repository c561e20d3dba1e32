//! Key path reconstruction.
//!
//! Authors nest keys by indentation: a blank path cell means "same as the
//! row above". The reconstruction is a left fold over the data rows where
//! the only carried state is the previous row's path.
//!
//! ```text
//! ###   >>>      >>>      en
//!       home              (section row, no values)
//!                title    Welcome       -> home.title
//!                subtitle Hi            -> home.subtitle
//!       about    title    About us      -> about.title
//!                         Contact       -> about.title
//! ```

use crate::models::{CellValue, KeyPath};

/// Path state threaded through the rows of one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PathState {
    segments: Vec<Option<String>>,
}

impl PathState {
    /// Initial state: `path_depth + 1` absent segments.
    pub fn new(path_depth: usize) -> Self {
        Self {
            segments: vec![None; path_depth + 1],
        }
    }

    /// Fold one row's path cells into the state.
    ///
    /// With `k` the first present cell, the new path keeps the first `k`
    /// segments and takes the row's own cells from `k` onward, absent ones
    /// included. A row without any present cell leaves the path unchanged.
    pub fn advance(&mut self, row_segments: &[CellValue]) {
        let Some(first) = row_segments.iter().position(|cell| !cell.is_absent()) else {
            return;
        };

        self.segments.truncate(first);
        self.segments
            .extend(row_segments[first..].iter().map(CellValue::as_text));
    }

    /// Present segments in order, absents removed.
    pub fn effective_path(&self) -> KeyPath {
        self.segments.iter().flatten().cloned().collect()
    }

    /// Raw segments, absents included.
    pub fn segments(&self) -> &[Option<String>] {
        &self.segments
    }
}

/// Path cells of a row: the columns between the tag and the languages.
pub fn path_segments(row: &[CellValue], path_depth: usize) -> &[CellValue] {
    let end = (path_depth + 1).min(row.len());
    row.get(1..end).unwrap_or(&[])
}

/// Iterator pairing every row with its effective path.
pub struct PathReconstructor<I> {
    rows: I,
    path_depth: usize,
    state: PathState,
}

impl<I> PathReconstructor<I> {
    pub fn new(rows: I, path_depth: usize) -> Self {
        Self {
            rows,
            path_depth,
            state: PathState::new(path_depth),
        }
    }
}

impl<'a, I> Iterator for PathReconstructor<I>
where
    I: Iterator<Item = &'a Vec<CellValue>>,
{
    type Item = (&'a Vec<CellValue>, KeyPath);

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.state.advance(path_segments(row, self.path_depth));
        Some((row, self.state.effective_path()))
    }
}

/// Effective path of every row, in order.
pub fn reconstruct_paths(rows: &[Vec<CellValue>], path_depth: usize) -> Vec<KeyPath> {
    PathReconstructor::new(rows.iter(), path_depth)
        .map(|(_, path)| path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grid;

    fn rows(rows: &[Vec<Option<&str>>]) -> Vec<Vec<CellValue>> {
        Grid::from_optional_rows(rows).rows().to_vec()
    }

    fn path(segments: &[&str]) -> KeyPath {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blank_path_inherits_previous() {
        let data = rows(&[
            vec![None, Some("home"), Some("title"), Some("Welcome")],
            vec![None, None, None, Some("Again")],
        ]);

        let paths = reconstruct_paths(&data, 2);
        assert_eq!(paths[0], path(&["home", "title"]));
        assert_eq!(paths[1], path(&["home", "title"]));
    }

    #[test]
    fn test_inner_override_keeps_prefix() {
        let data = rows(&[
            vec![None, Some("home"), None, None],
            vec![None, None, Some("title"), Some("Welcome")],
            vec![None, None, Some("subtitle"), Some("Hi")],
            vec![None, Some("about"), Some("title"), Some("About us")],
        ]);

        let paths = reconstruct_paths(&data, 2);
        assert_eq!(paths[0], path(&["home"]));
        assert_eq!(paths[1], path(&["home", "title"]));
        assert_eq!(paths[2], path(&["home", "subtitle"]));
        assert_eq!(paths[3], path(&["about", "title"]));
    }

    #[test]
    fn test_outer_override_shortens_path() {
        let data = rows(&[
            vec![None, Some("a"), Some("b"), Some("c"), Some("x")],
            vec![None, Some("d"), None, None, Some("y")],
        ]);

        let paths = reconstruct_paths(&data, 3);
        assert_eq!(paths[1], path(&["d"]));
        assert_eq!(paths[1].len(), 1);
    }

    #[test]
    fn test_mid_override_drops_deeper_segments() {
        let data = rows(&[
            vec![None, Some("a"), Some("b"), Some("c"), Some("x")],
            vec![None, None, Some("e"), None, Some("y")],
        ]);

        let paths = reconstruct_paths(&data, 3);
        assert_eq!(paths[1], path(&["a", "e"]));
    }

    #[test]
    fn test_hole_inside_row_is_stripped() {
        let data = rows(&[vec![None, Some("a"), None, Some("c"), Some("x")]]);

        let paths = reconstruct_paths(&data, 3);
        assert_eq!(paths[0], path(&["a", "c"]));
    }

    #[test]
    fn test_initial_state_is_empty() {
        let state = PathState::new(2);
        assert_eq!(state.segments().len(), 3);
        assert!(state.effective_path().is_empty());

        let data = rows(&[vec![None, None, None, Some("orphan")]]);
        assert!(reconstruct_paths(&data, 2)[0].is_empty());
    }

    #[test]
    fn test_zero_depth_has_no_segments() {
        let data = rows(&[vec![Some("tag"), Some("value")]]);
        assert!(path_segments(&data[0], 0).is_empty());
        assert!(reconstruct_paths(&data, 0)[0].is_empty());
    }

    #[test]
    fn test_numeric_segments_render_as_text() {
        let mut state = PathState::new(2);
        state.advance(&[CellValue::from("errors"), CellValue::Number(404.0)]);
        assert_eq!(state.effective_path(), path(&["errors", "404"]));
    }

    #[test]
    fn test_fold_is_restartable() {
        let data = rows(&[
            vec![None, Some("a"), Some("b"), Some("x")],
            vec![None, None, Some("c"), Some("y")],
        ]);

        assert_eq!(reconstruct_paths(&data, 2), reconstruct_paths(&data, 2));
    }
}
