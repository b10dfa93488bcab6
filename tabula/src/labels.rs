//! User-facing strings.

use serde::{Deserialize, Serialize};

/// Every string the table renders on its own.
///
/// Callers pick a locale preset or override individual fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub yes: String,
    pub no: String,
    pub create: String,
    pub edit: String,
    pub delete: String,
    pub search_placeholder: String,
    pub clear: String,
    pub clear_all: String,
    pub apply: String,
    pub applied_suffix: String,
    pub pick_filter: String,
    pub range_min: String,
    pub range_max: String,
    pub previous: String,
    pub next: String,
    pub no_data: String,
    pub no_matches: String,
    pub selected_suffix: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

impl Labels {
    pub fn english() -> Self {
        Self {
            yes: "Yes".into(),
            no: "No".into(),
            create: "Create".into(),
            edit: "Edit".into(),
            delete: "Delete".into(),
            search_placeholder: "Search...".into(),
            clear: "Clear".into(),
            clear_all: "Clear all".into(),
            apply: "Apply".into(),
            applied_suffix: "(applied)".into(),
            pick_filter: "Add filter".into(),
            range_min: "Min".into(),
            range_max: "Max".into(),
            previous: "Previous".into(),
            next: "Next".into(),
            no_data: "No records yet.".into(),
            no_matches: "No records match the current filters or search.".into(),
            selected_suffix: "selected".into(),
        }
    }

    pub fn spanish() -> Self {
        Self {
            yes: "Sí".into(),
            no: "No".into(),
            create: "Crear".into(),
            edit: "Editar".into(),
            delete: "Eliminar".into(),
            search_placeholder: "Buscar...".into(),
            clear: "Limpiar".into(),
            clear_all: "Limpiar todo".into(),
            apply: "Aplicar".into(),
            applied_suffix: "(aplicado)".into(),
            pick_filter: "Agregar filtro".into(),
            range_min: "Mín".into(),
            range_max: "Máx".into(),
            previous: "Anterior".into(),
            next: "Siguiente".into(),
            no_data: "No hay registros.".into(),
            no_matches: "Ningún registro coincide con los filtros o la búsqueda.".into(),
            selected_suffix: "seleccionados".into(),
        }
    }

    /// Preset for a locale code such as `es` or `en-US`. Unknown codes
    /// fall back to English.
    pub fn for_locale(code: &str) -> Self {
        match code.split(['-', '_']).next().unwrap_or_default() {
            "es" => Self::spanish(),
            _ => Self::english(),
        }
    }
}
