//! The portal's destinations and the role tables over them.

use serde::{Deserialize, Serialize};

use caregate_protocol::Role;

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// Every screen the portal client can navigate to.
///
/// A closed enum, like [`Role`]: screens are a fixed part of the portal,
/// and keeping them enumerable is what lets the guard be a total
/// function instead of string matching on paths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// The login form. Anonymous-only.
    Login,
    /// Patient self-registration. Anonymous-only.
    Signup,
    /// Admin landing: doctors, patients, appointment oversight.
    AdminHome,
    /// Doctor landing: appointment queue, screening reviews.
    DoctorHome,
    /// Patient landing: upcoming appointments, results.
    PatientHome,
    /// Screening-image upload and results. Patient-only.
    Screening,
    /// Appointment booking flow. Patient-only.
    Booking,
    /// Wellness calculators. Patient-only.
    Wellness,
    /// Shown when a session holds the wrong role for a screen.
    Unauthorized,
    /// Catch-all for unrecognized paths.
    NotFound,
}

impl Route {
    /// The canonical path for this destination.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::AdminHome => "/admin",
            Route::DoctorHome => "/doctor",
            Route::PatientHome => "/patient",
            Route::Screening => "/tumor-detection",
            Route::Booking => "/appointment-booking",
            Route::Wellness => "/wellness",
            Route::Unauthorized => "/unauthorized",
            Route::NotFound => "/not-found",
        }
    }
}

/// Display prints the canonical path, which is what log lines and
/// redirect notices want.
impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// Role tables
// ---------------------------------------------------------------------------

/// The home destination for a role.
///
/// Total over the closed [`Role`] enumeration — there is no fallback arm
/// and no guessed default. A role value outside the enumeration cannot
/// reach this function at all: it already failed loudly at the wire or
/// storage boundary ([`ProtocolError::UnknownRole`]).
///
/// [`ProtocolError::UnknownRole`]: caregate_protocol::ProtocolError::UnknownRole
pub fn home_of(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminHome,
        Role::Doctor => Route::DoctorHome,
        Role::Patient => Route::PatientHome,
    }
}

/// The roles permitted on a route, or `None` for routes with no session
/// requirement (login, signup, the unauthorized/not-found screens).
///
/// This table is the one place role restrictions live. The guard
/// consults it; so can a sidebar deciding which links to draw.
pub fn allowed_roles(route: Route) -> Option<&'static [Role]> {
    match route {
        Route::Login | Route::Signup => None,
        Route::Unauthorized | Route::NotFound => None,
        Route::AdminHome => Some(&[Role::Admin]),
        Route::DoctorHome => Some(&[Role::Doctor]),
        Route::PatientHome => Some(&[Role::Patient]),
        // The screening, booking and wellness flows are patient-facing.
        Route::Screening | Route::Booking | Route::Wellness => {
            Some(&[Role::Patient])
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_of_maps_each_role_to_its_own_home() {
        assert_eq!(home_of(Role::Admin), Route::AdminHome);
        assert_eq!(home_of(Role::Doctor), Route::DoctorHome);
        assert_eq!(home_of(Role::Patient), Route::PatientHome);
    }

    #[test]
    fn test_home_of_is_injective() {
        // No two roles share a home; a collision would let the redirect
        // leak one role's screen to another.
        let homes: Vec<Route> = Role::ALL.iter().map(|r| home_of(*r)).collect();
        for (i, a) in homes.iter().enumerate() {
            for b in &homes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_role_fails_before_reaching_home_of() {
        // The "nurse" scenario: the value is stopped at the parse
        // boundary with a diagnosable error. home_of never sees it,
        // which is the strongest form of "no silent default".
        let err = "nurse".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("nurse"));
    }

    #[test]
    fn test_public_routes_have_no_role_table() {
        assert_eq!(allowed_roles(Route::Login), None);
        assert_eq!(allowed_roles(Route::Signup), None);
        assert_eq!(allowed_roles(Route::Unauthorized), None);
        assert_eq!(allowed_roles(Route::NotFound), None);
    }

    #[test]
    fn test_each_home_admits_exactly_its_role() {
        for role in Role::ALL {
            let allowed = allowed_roles(home_of(role)).unwrap();
            assert_eq!(allowed, &[role]);
        }
    }

    #[test]
    fn test_patient_flows_are_patient_only() {
        for route in [Route::Screening, Route::Booking, Route::Wellness] {
            assert_eq!(allowed_roles(route), Some(&[Role::Patient][..]));
        }
    }

    #[test]
    fn test_route_path_round_trips_through_display() {
        assert_eq!(Route::Screening.to_string(), "/tumor-detection");
        assert_eq!(Route::AdminHome.path(), "/admin");
    }

    #[test]
    fn test_route_serializes_as_snake_case() {
        let json = serde_json::to_string(&Route::PatientHome).unwrap();
        assert_eq!(json, "\"patient_home\"");
    }
}
