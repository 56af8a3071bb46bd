//! Commute check against the user's destination station.
//!
//! Runs only over listings that survived the first filter pass, because
//! every route lookup is a paid external call. A listing without
//! coordinates or without a resolvable route passes provisionally; only a
//! measured duration over the bound fails.

use domain::{CommuteResult, Listing, UserCriteria};
use transit_client::station_coords;

use crate::traits::TransitRoutes;

pub async fn check(
    listing: &mut Listing,
    criteria: &UserCriteria,
    transit: &dyn TransitRoutes,
) -> Option<CommuteResult> {
    let destination = criteria.commute_destination.as_deref()?;
    let Some(dest_coords) = station_coords(destination) else {
        tracing::warn!(destination, "unknown commute destination station");
        return None;
    };

    let origin = match (listing.latitude, listing.longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Some(CommuteResult {
                listing_id: listing.id.clone(),
                minutes: None,
                transfers: None,
                path_kind: None,
                passed: true,
            });
        }
    };

    let route = transit.transit_route(origin, dest_coords).await;
    let Some(route) = route else {
        return Some(CommuteResult {
            listing_id: listing.id.clone(),
            minutes: None,
            transfers: None,
            path_kind: None,
            passed: true,
        });
    };

    listing.push_note(format!(
        "[통근 정보] {destination}까지 약 {}분 ({}, 환승 {}회)",
        route.total_minutes, route.path_kind, route.transfers
    ));

    let passed = match criteria.max_commute_minutes {
        Some(max) => route.total_minutes <= max,
        None => true,
    };

    Some(CommuteResult {
        listing_id: listing.id.clone(),
        minutes: Some(route.total_minutes),
        transfers: Some(route.transfers),
        path_kind: Some(route.path_kind),
        passed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::ListingSource;
    use transit_client::TransitRoute;

    struct FixedRoute(Option<TransitRoute>);

    #[async_trait]
    impl TransitRoutes for FixedRoute {
        async fn transit_route(
            &self,
            _start: (f64, f64),
            _end: (f64, f64),
        ) -> Option<TransitRoute> {
            self.0.clone()
        }
    }

    fn located_listing() -> Listing {
        let mut l = Listing::new("naver_1", ListingSource::Naver);
        l.latitude = Some(37.527);
        l.longitude = Some(126.896);
        l
    }

    fn criteria(max: Option<u32>) -> UserCriteria {
        UserCriteria {
            commute_destination: Some("여의도역".to_string()),
            max_commute_minutes: max,
            ..Default::default()
        }
    }

    fn route(minutes: u32) -> TransitRoute {
        TransitRoute {
            total_minutes: minutes,
            walk_minutes: 8,
            transfers: 1,
            path_kind: "지하철".to_string(),
        }
    }

    #[tokio::test]
    async fn no_destination_means_no_check() {
        let mut l = located_listing();
        let criteria = UserCriteria::default();
        assert!(check(&mut l, &criteria, &FixedRoute(None)).await.is_none());
    }

    #[tokio::test]
    async fn within_bound_passes_and_annotates() {
        let mut l = located_listing();
        let result = check(&mut l, &criteria(Some(40)), &FixedRoute(Some(route(28))))
            .await
            .unwrap();
        assert!(result.passed);
        assert_eq!(result.minutes, Some(28));
        assert_eq!(l.notes.len(), 1);
        assert_eq!(l.notes[0], "[통근 정보] 여의도역까지 약 28분 (지하철, 환승 1회)");
    }

    #[tokio::test]
    async fn over_bound_fails() {
        let mut l = located_listing();
        let result = check(&mut l, &criteria(Some(40)), &FixedRoute(Some(route(55))))
            .await
            .unwrap();
        assert!(!result.passed);
        assert_eq!(result.minutes, Some(55));
    }

    #[tokio::test]
    async fn missing_coordinates_pass_provisionally() {
        let mut l = Listing::new("naver_2", ListingSource::Naver);
        let result = check(&mut l, &criteria(Some(40)), &FixedRoute(Some(route(55))))
            .await
            .unwrap();
        assert!(result.passed);
        assert_eq!(result.minutes, None);
        assert!(l.notes.is_empty());
    }

    #[tokio::test]
    async fn failed_route_lookup_passes_provisionally() {
        let mut l = located_listing();
        let result = check(&mut l, &criteria(Some(40)), &FixedRoute(None))
            .await
            .unwrap();
        assert!(result.passed);
        assert_eq!(result.minutes, None);
    }
}
