//! Property-based tests for reason construction and mutation
//!
//! These check the invariants that must hold for any ids, URIs and field
//! values: link derivation, removal idempotency, and that a patch touches
//! only the fields it carries.

mod common;

use chrono::NaiveDate;
use extension_requests::{
    builder::ReasonBuilder,
    dto::{CreateReason, ReasonPatch},
    model::Request,
    service::ReasonsService,
};
use proptest::prelude::*;

// PROPERTY TEST STRATEGIES

/// Strategy to generate identifier-like strings
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9-]{1,36}"
}

/// Strategy to generate URIs without a trailing separator
fn uri_strategy() -> impl Strategy<Value = String> {
    "(/[a-z0-9]{1,12}){1,5}"
}

fn date_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((2000i32..=2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }))
}

fn text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z ]{1,24}")
}

fn request_with(ids: &[String]) -> Request {
    let mut request = common::dummy_request("R");
    for id in ids {
        request.add_reason(ReasonBuilder::blank().with_id(id.clone()).build());
    }
    request
}

// PROPERTY TESTS
proptest! {
    /// Property: with_id then with_links always yields `uri/id`
    #[test]
    fn link_is_uri_slash_id(id in id_strategy(), uri in uri_strategy()) {
        let reason = ReasonBuilder::blank()
            .with_id(id.clone())
            .with_links(&uri)
            .build();

        prop_assert_eq!(reason.links().self_link.clone(), Some(format!("{}/{}", uri, id)));
        prop_assert_eq!(reason.id(), id.as_str());
    }

    /// Property: removing the same reason twice equals removing it once,
    /// and the survivors keep their relative order
    #[test]
    fn remove_is_idempotent(
        ids in prop::collection::hash_set(id_strategy(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let ids: Vec<String> = ids.into_iter().collect();
        let target = ids[pick.index(ids.len())].clone();

        let repository = common::counted();
        repository.seed(request_with(&ids));
        let service = ReasonsService::new(repository.clone());

        let once = service.remove_reason("R", &target).unwrap();
        let twice = service.remove_reason("R", &target).unwrap();

        let expected: Vec<&String> = ids.iter().filter(|id| **id != target).collect();
        let once_ids: Vec<String> = once.reasons().iter().map(|r| r.id().to_string()).collect();
        let twice_ids: Vec<String> = twice.reasons().iter().map(|r| r.id().to_string()).collect();

        prop_assert_eq!(once_ids.iter().collect::<Vec<_>>(), expected);
        prop_assert_eq!(once_ids, twice_ids);
    }

    /// Property: a patch carrying only additional_text changes nothing else
    #[test]
    fn additional_text_patch_is_isolated(
        reason in text_strategy(),
        old_text in text_strategy(),
        new_text in "[a-zA-Z ]{1,24}",
        start_on in date_strategy(),
        end_on in date_strategy(),
    ) {
        let mut builder = ReasonBuilder::blank()
            .with_id("reason1")
            .with_links("/requests/R/reasons")
            .with_start_on(start_on)
            .with_end_on(end_on);
        if let Some(reason) = reason {
            builder = builder.with_reason(reason);
        }
        if let Some(old_text) = old_text {
            builder = builder.with_additional_text(old_text);
        }
        let mut request = common::dummy_request("R");
        request.add_reason(builder.build());

        let repository = common::counted();
        let before = repository.seed(request).reason("reason1").cloned().unwrap();

        ReasonsService::new(repository.clone())
            .patch_reason("R", "reason1", ReasonPatch {
                additional_text: Some(new_text.clone()),
                ..ReasonPatch::default()
            })
            .unwrap();

        let stored = repository.stored("R").unwrap();
        let after = stored.reason("reason1").unwrap();
        prop_assert_eq!(after.additional_text(), Some(new_text.as_str()));
        prop_assert_eq!(after.reason(), before.reason());
        prop_assert_eq!(after.start_on(), before.start_on());
        prop_assert_eq!(after.end_on(), before.end_on());
        prop_assert_eq!(after.links(), before.links());
        prop_assert_eq!(repository.saves(), 1);
    }

    /// Property: added reasons never reuse an id already in the request
    #[test]
    fn added_reason_ids_are_fresh(existing in prop::collection::hash_set(id_strategy(), 0..6)) {
        let existing: Vec<String> = existing.into_iter().collect();
        let repository = common::counted();
        repository.seed(request_with(&existing));

        let view = ReasonsService::new(repository.clone())
            .add_reason("R", CreateReason::default(), "/requests/R/reasons")
            .unwrap()
            .into_data()
            .unwrap();

        prop_assert!(!existing.contains(&view.id));
        prop_assert_eq!(repository.stored("R").unwrap().reasons().len(), existing.len() + 1);
    }
}
