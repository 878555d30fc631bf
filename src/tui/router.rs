//! Client-side routes
//!
//! Paths are the same ones the API's approval processes point at
//! (`/credit-facilities/<id>`, `/withdrawals/<id>`), so a row's navigation
//! target can be followed without translation.

use super::traits::Navigator;

/// The seven list screens, in number-key order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Customers,
    CreditFacilities,
    Withdrawals,
    Deposits,
    Committees,
    Policies,
    Actions,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        Self::Customers,
        Self::CreditFacilities,
        Self::Withdrawals,
        Self::Deposits,
        Self::Committees,
        Self::Policies,
        Self::Actions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::CreditFacilities => "Credit Facilities",
            Self::Withdrawals => "Withdrawals",
            Self::Deposits => "Deposits",
            Self::Committees => "Committees",
            Self::Policies => "Policies",
            Self::Actions => "Actions",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Customers => "/customers",
            Self::CreditFacilities => "/credit-facilities",
            Self::Withdrawals => "/withdrawals",
            Self::Deposits => "/deposits",
            Self::Committees => "/committees",
            Self::Policies => "/policies",
            Self::Actions => "/actions",
        }
    }

    /// `'1'..='7'`
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A list, optionally with a row to focus once loaded
    List {
        kind: ViewKind,
        selected: Option<String>,
    },
    CreditFacility(String),
    NotFound(String),
}

impl Route {
    pub fn list(kind: ViewKind) -> Self {
        Self::List {
            kind,
            selected: None,
        }
    }

    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let list = |kind: &str| ViewKind::ALL.iter().copied().find(|k| k.path() == format!("/{}", kind));

        match segments.as_slice() {
            [""] => Self::list(ViewKind::Customers),
            ["credit-facilities", id] if !id.is_empty() => Self::CreditFacility(id.to_string()),
            [kind @ ("customers" | "withdrawals" | "deposits"), id] if !id.is_empty() => {
                match list(*kind) {
                    Some(kind) => Self::List {
                        kind,
                        selected: Some(id.to_string()),
                    },
                    None => Self::NotFound(path.to_string()),
                }
            }
            [kind] => match list(*kind) {
                Some(kind) => Self::list(kind),
                None => Self::NotFound(path.to_string()),
            },
            _ => Self::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::List {
                kind,
                selected: Some(id),
            } => format!("{}/{}", kind.path(), id),
            Self::List { kind, .. } => kind.path().to_string(),
            Self::CreditFacility(id) => format!("/credit-facilities/{}", id),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// List this route belongs to, for the title bar tabs
    pub fn view_kind(&self) -> Option<ViewKind> {
        match self {
            Self::List { kind, .. } => Some(*kind),
            Self::CreditFacility(_) => Some(ViewKind::CreditFacilities),
            Self::NotFound(_) => None,
        }
    }
}

/// Current route plus back history
#[derive(Debug)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
    /// Route left by the last navigation, until the App picks it up
    changed_from: Option<Route>,
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
            changed_from: None,
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn go(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        tracing::debug!(from = %self.current.path(), to = %route.path(), "Navigate");
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous.clone());
        self.changed_from.get_or_insert(previous);
    }

    /// Pop one level of history; false at the root
    pub fn back(&mut self) -> bool {
        let Some(route) = self.history.pop() else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, route);
        self.changed_from.get_or_insert(previous);
        true
    }

    /// Route that was left since the last call, if any
    pub fn take_changed(&mut self) -> Option<Route> {
        self.changed_from.take()
    }
}

impl Navigator for Router {
    fn navigate(&mut self, path: &str) {
        self.go(Route::parse(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::list(ViewKind::Customers));
        assert_eq!(Route::parse("/policies"), Route::list(ViewKind::Policies));
        assert_eq!(
            Route::parse("/credit-facilities/cf-1"),
            Route::CreditFacility("cf-1".to_string())
        );
        assert_eq!(
            Route::parse("/withdrawals/w-9"),
            Route::List {
                kind: ViewKind::Withdrawals,
                selected: Some("w-9".to_string())
            }
        );
    }

    #[test]
    fn unknown_and_disbursal_paths_are_not_found() {
        assert_eq!(
            Route::parse("/disbursals/d-1"),
            Route::NotFound("/disbursals/d-1".to_string())
        );
        assert!(matches!(Route::parse("/nope"), Route::NotFound(_)));
        assert!(matches!(Route::parse("/policies/p-1/extra"), Route::NotFound(_)));
    }

    #[test]
    fn paths_round_trip() {
        for path in ["/customers", "/credit-facilities/cf-1", "/withdrawals/w-1", "/actions"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn digits_select_views() {
        assert_eq!(ViewKind::from_digit('1'), Some(ViewKind::Customers));
        assert_eq!(ViewKind::from_digit('7'), Some(ViewKind::Actions));
        assert_eq!(ViewKind::from_digit('0'), None);
        assert_eq!(ViewKind::from_digit('8'), None);
    }

    #[test]
    fn navigation_records_history_once() {
        let mut router = Router::new(Route::list(ViewKind::Actions));
        router.navigate("/credit-facilities/cf-1");
        router.navigate("/credit-facilities/cf-1");
        assert_eq!(router.take_changed(), Some(Route::list(ViewKind::Actions)));
        assert_eq!(router.take_changed(), None);

        assert!(router.back());
        assert_eq!(router.current(), &Route::list(ViewKind::Actions));
        assert!(router.take_changed().is_some());
        assert!(!router.back());
    }
}
