//! Board configuration, validation, and error types.
//!
//! [`BoardConfig`] is the input for constructing a
//! [`BoardContext`](crate::BoardContext). [`validate()`](BoardConfig::validate)
//! checks the invariants that do not need a resolved matrix; grid
//! geometry and rule references are checked when the board is built.

use std::error::Error;
use std::fmt;

use swimlane_core::Coord;
use swimlane_grid::{AttrKind, CellDef, GridError, GridSource};
use swimlane_rules::RuleCatalog;

use crate::callbacks::{handler_names, CallbackRegistry};
use crate::matrix::BuildError;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`BoardConfig`] or building a
/// board from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The cell geometry is invalid.
    Grid(GridError),
    /// Rule resolution failed.
    Build(BuildError),
    /// The default template is present but empty.
    EmptyDefaultTemplate,
    /// A header names a callback handler the registry lacks.
    UnknownCallback {
        /// The missing handler name.
        name: String,
        /// Anchor of the declaring header.
        cell: Coord,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Build(e) => write!(f, "build: {e}"),
            Self::EmptyDefaultTemplate => write!(f, "default template must not be empty"),
            Self::UnknownCallback { name, cell } => {
                write!(f, "callback handler '{name}' declared at {cell} is not registered")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Build(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<BuildError> for ConfigError {
    fn from(e: BuildError) -> Self {
        Self::Build(e)
    }
}

// ── BoardConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a board.
pub struct BoardConfig<T> {
    /// Positioned cells, in any order.
    pub cells: Vec<CellDef>,
    /// Rules the cells may reference.
    pub catalog: RuleCatalog<T>,
    /// Template for content cells no declaration governs.
    pub default_template: Option<String>,
    /// Evaluate WIP limits after every population. Default: true.
    pub validate_limits: bool,
    /// Callback handlers. `None` disables callbacks entirely.
    pub callbacks: Option<CallbackRegistry<T>>,
}

impl<T> BoardConfig<T> {
    /// A configuration with limit validation on and no default template
    /// or callbacks.
    pub fn new(cells: Vec<CellDef>, catalog: RuleCatalog<T>) -> Self {
        Self {
            cells,
            catalog,
            default_template: None,
            validate_limits: true,
            callbacks: None,
        }
    }

    /// Collect cells from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Grid`] if the source cannot supply cells.
    pub fn from_source<S: GridSource + ?Sized>(
        source: &S,
        catalog: RuleCatalog<T>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(source.cell_defs()?, catalog))
    }

    /// Set the default template.
    pub fn with_default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = Some(template.into());
        self
    }

    /// Install callback handlers.
    pub fn with_callbacks(mut self, callbacks: CallbackRegistry<T>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    /// Validate the invariants that need no resolved matrix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. At least one cell.
        if self.cells.is_empty() {
            return Err(ConfigError::Grid(GridError::EmptyGrid));
        }
        // 2. A default template, if set, must name something.
        if self.default_template.as_deref() == Some("") {
            return Err(ConfigError::EmptyDefaultTemplate);
        }
        // 3. Every handler a header names must be registered.
        if let Some(registry) = &self.callbacks {
            for def in self.cells.iter().filter(|d| d.is_header()) {
                let Some(names) = def.attrs.value(AttrKind::Callbacks) else {
                    continue;
                };
                if let Some(name) = handler_names(names).find(|n| !registry.contains(n)) {
                    return Err(ConfigError::UnknownCallback {
                        name: name.to_string(),
                        cell: def.anchor,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for BoardConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardConfig")
            .field("cells", &self.cells.len())
            .field("catalog", &self.catalog.len())
            .field("default_template", &self.default_template)
            .field("validate_limits", &self.validate_limits)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
