//! Template-driven rendering of content cells.
//!
//! The engine never looks inside a rendered fragment: it picks a
//! renderer by the cell's resolved template and hands it each ticket plus
//! the cell's style list.

use std::fmt;

use indexmap::IndexMap;

use swimlane_core::{CellId, Coord, RenderError, TicketIndex};

use crate::matrix::RuleMatrix;

/// Turns one ticket into an opaque fragment.
pub trait Renderer<T, F> {
    /// Render `ticket` with the style tags of its cell.
    fn render(&self, ticket: &T, styles: &[String]) -> Result<F, String>;
}

impl<T, F, R> Renderer<T, F> for R
where
    R: Fn(&T, &[String]) -> Result<F, String>,
{
    fn render(&self, ticket: &T, styles: &[String]) -> Result<F, String> {
        self(ticket, styles)
    }
}

/// Renderers by template name, plus the one used when a cell's template
/// is missing or unknown.
pub struct TemplateSet<T, F> {
    templates: IndexMap<String, Box<dyn Renderer<T, F>>>,
    fallback: Box<dyn Renderer<T, F>>,
}

impl<T, F> TemplateSet<T, F> {
    /// A set with only the fallback renderer.
    pub fn new(fallback: impl Renderer<T, F> + 'static) -> Self {
        Self {
            templates: IndexMap::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Register `renderer` for `template`.
    pub fn insert(&mut self, template: impl Into<String>, renderer: impl Renderer<T, F> + 'static) {
        self.templates.insert(template.into(), Box::new(renderer));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, template: impl Into<String>, renderer: impl Renderer<T, F> + 'static) -> Self {
        self.insert(template, renderer);
        self
    }

    /// Whether a renderer is registered for `template`.
    pub fn contains(&self, template: &str) -> bool {
        self.templates.contains_key(template)
    }

    /// The renderer for `template`, falling back when it is absent.
    pub fn select(&self, template: Option<&str>) -> &dyn Renderer<T, F> {
        template
            .and_then(|t| self.templates.get(t))
            .map_or(&*self.fallback, |r| &**r)
    }
}

impl<T, F> fmt::Debug for TemplateSet<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSet")
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// The rendered tickets of one content cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedCell<F> {
    /// The cell.
    pub id: CellId,
    /// Anchor of the cell.
    pub anchor: Coord,
    /// The resolved template, if any.
    pub template: Option<String>,
    /// The style tags handed to the renderer.
    pub styles: Vec<String>,
    /// One fragment per ticket, in the cell's ticket order.
    pub fragments: Vec<F>,
}

/// Render the tickets of every content cell, in document order.
///
/// # Errors
///
/// Returns [`RenderError::RendererFailed`] for the first ticket a
/// renderer refuses.
pub fn render_board<T, F>(
    matrix: &RuleMatrix<T>,
    tickets: &[T],
    templates: &TemplateSet<T, F>,
) -> Result<Vec<RenderedCell<F>>, RenderError> {
    let grid = matrix.grid();
    grid.content_cells()
        .map(|id| {
            let cell = matrix.cell(id);
            let anchor = grid.cell(id).anchor;
            let renderer = templates.select(cell.template());
            let fragments = cell
                .tickets()
                .iter()
                .enumerate()
                .map(|(position, &t)| {
                    renderer
                        .render(&tickets[t.0], cell.styles())
                        .map_err(|reason| render_failed(anchor, position, t, cell.template(), reason))
                })
                .collect::<Result<Vec<F>, RenderError>>()?;
            Ok(RenderedCell {
                id,
                anchor,
                template: cell.template().map(str::to_string),
                styles: cell.styles().to_vec(),
                fragments,
            })
        })
        .collect()
}

fn render_failed(
    cell: Coord,
    position: usize,
    ticket: TicketIndex,
    template: Option<&str>,
    reason: String,
) -> RenderError {
    RenderError::RendererFailed {
        cell,
        position,
        ticket,
        template: template.map(str::to_string),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::matrix::RuleMatrixBuilder;
    use swimlane_grid::{CellSpec, Grid, TableLayout};
    use swimlane_rules::{Rule, RuleCatalog};

    fn matrix() -> RuleMatrix<&'static str> {
        let mut c = RuleCatalog::new();
        c.register(Rule::new("hot", |s: &&str| s.starts_with('!')).styled("red"))
            .unwrap();
        let grid = Grid::from_source(
            &TableLayout::new()
                .row(vec![CellSpec::header().rules("hot").template("alarm"), CellSpec::header()])
                .row(vec![CellSpec::content(), CellSpec::content()]),
        )
        .unwrap();
        RuleMatrixBuilder::new(grid, c)
            .default_template("card")
            .build()
            .unwrap()
    }

    fn plain(t: &&str, _: &[String]) -> Result<String, String> {
        Ok(format!("<{t}>"))
    }

    #[test]
    fn renderer_chosen_by_template() {
        let mut m = matrix();
        let tickets = vec!["!fire", "calm"];
        classify(&mut m, &tickets).unwrap();

        let templates = TemplateSet::new(plain).with(
            "alarm",
            |t: &&str, styles: &[String]| -> Result<String, String> {
                Ok(format!("{}:{t}", styles.join(" ")))
            },
        );
        let cells = render_board(&m, &tickets, &templates).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].fragments, ["red:!fire"]);
        assert_eq!(cells[0].template.as_deref(), Some("alarm"));
        // "card" is not registered: the fallback renders it.
        assert_eq!(cells[1].fragments, ["<calm>"]);
        assert_eq!(cells[1].template.as_deref(), Some("card"));
    }

    #[test]
    fn failure_names_cell_ticket_and_template() {
        let mut m = matrix();
        let tickets = vec!["!fire"];
        classify(&mut m, &tickets).unwrap();
        let templates = TemplateSet::new(plain).with(
            "alarm",
            |_: &&str, _: &[String]| -> Result<String, String> { Err("no ink".into()) },
        );
        match render_board(&m, &tickets, &templates) {
            Err(RenderError::RendererFailed {
                cell,
                position,
                ticket,
                template,
                reason,
            }) => {
                assert_eq!(cell, Coord::new(1, 0));
                assert_eq!(position, 0);
                assert_eq!(ticket, TicketIndex(0));
                assert_eq!(template.as_deref(), Some("alarm"));
                assert_eq!(reason, "no ink");
            }
            other => panic!("expected RendererFailed, got {other:?}"),
        }
    }

    #[test]
    fn select_falls_back() {
        let templates: TemplateSet<&str, String> = TemplateSet::new(plain);
        assert!(!templates.contains("x"));
        let out = templates.select(None).render(&"t", &[]).unwrap();
        assert_eq!(out, "<t>");
    }
}
