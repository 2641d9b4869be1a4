//! The two screens of the application and path resolution between them.

/// Path of the invoice form.
pub const INVOICE_FORM_PATH: &str = "factura";

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Shell with summary counters; hosts the invoice form.
    Dashboard,
    /// Invoice entry form, rendered inside the dashboard shell.
    InvoiceForm,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "",
            Self::InvoiceForm => INVOICE_FORM_PATH,
        }
    }

    /// Enclosing view, if this one is rendered inside another.
    pub fn parent(&self) -> Option<Route> {
        match self {
            Self::Dashboard => None,
            Self::InvoiceForm => Some(Self::Dashboard),
        }
    }
}

/// Outcome of resolving a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: Route,
    /// Path actually shown after any redirect.
    pub path: &'static str,
    pub redirected: bool,
}

/// Resolve a requested path. The root redirects to the invoice form and
/// unknown paths redirect to the root.
pub fn resolve(path: &str) -> Resolution {
    let requested = path.trim().trim_matches('/');
    Resolution {
        route: Route::InvoiceForm,
        path: INVOICE_FORM_PATH,
        redirected: requested != INVOICE_FORM_PATH,
    }
}

/// Counters shown on the dashboard.
///
/// These are fixed placeholder values, not derived from any invoice data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub business_name: &'static str,
    pub invoices_this_month: u32,
    pub period_label: &'static str,
    pub total_invoiced: &'static str,
    pub growth_label: &'static str,
    pub active_clients: u32,
}

impl DashboardSummary {
    pub fn placeholder() -> Self {
        Self {
            business_name: "TALLERES VIVES",
            invoices_this_month: 47,
            period_label: "Enero 2026",
            total_invoiced: "€12,450",
            growth_label: "↗︎ 12% este mes",
            active_clients: 134,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_to_form() {
        for p in ["", "/"] {
            let r = resolve(p);
            assert_eq!(r.route, Route::InvoiceForm);
            assert!(r.redirected);
            assert_eq!(r.path, "factura");
        }
    }

    #[test]
    fn form_path_resolves_directly() {
        let r = resolve("/factura");
        assert_eq!(r.route, Route::InvoiceForm);
        assert!(!r.redirected);
        assert_eq!(r.route.parent(), Some(Route::Dashboard));
        assert_eq!(Route::Dashboard.parent(), None);
    }

    #[test]
    fn unknown_path_ends_on_default_view() {
        let r = resolve("/clientes/42");
        assert_eq!(r.route, Route::InvoiceForm);
        assert!(r.redirected);
    }

    #[test]
    fn placeholder_counters() {
        let s = DashboardSummary::placeholder();
        assert_eq!(s.invoices_this_month, 47);
        assert_eq!(s.active_clients, 134);
        assert_eq!(s.total_invoiced, "€12,450");
    }
}
