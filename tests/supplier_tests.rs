//! Supplier behavior against mocked listing and read collaborators

mod common;

use common::{echo_value, named, Harness, MockListApi, MockStateReader};
use gcpinv::alerter::Alert;
use gcpinv::error::Error;
use gcpinv::remote::dns::DnsRecordSetSupplier;
use gcpinv::remote::iam::ServiceAccountKeySupplier;
use gcpinv::remote::{build_suppliers, ListingSupplier, Supplier};
use gcpinv::resource::compute::{ComputeDisk, ComputeInstance, ComputeNetwork};
use gcpinv::resource::iam::ServiceAccount;
use gcpinv::resource::storage::StorageBucketNotification;
use gcpinv::resource::{GoogleResource, NormalizedValue};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

const NETWORKS: &str = "projects/test-project/global/networks";
const DISKS: &str = "projects/test-project/aggregated/disks";
const INSTANCES: &str = "projects/test-project/aggregated/instances";
const BUCKETS: &str = "b";
const ZONES: &str = "projects/test-project/managedZones";
const ACCOUNTS: &str = "projects/test-project/serviceAccounts";

fn ids(resources: &[GoogleResource]) -> Vec<String> {
    let mut ids: Vec<String> = resources.iter().map(|r| r.id().to_string()).collect();
    ids.sort();
    ids
}

/// An empty listing gives an empty inventory without reads or alerts
#[tokio::test]
async fn test_empty_listing_yields_no_resources() {
    let harness = Harness::new(
        MockListApi::new().with_items(NETWORKS, vec![]),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let resources = assert_ok!(supplier.resources().await);
    assert!(resources.is_empty());
    assert_eq!(harness.reader.calls(), 0);
    assert!(harness.ctx.alerter.retrieve().is_empty());
}

/// Every item of every page is read exactly once
#[tokio::test]
async fn test_paged_listing_reads_every_item() {
    let harness = Harness::new(
        MockListApi::new().with_pages(NETWORKS, vec![named(&["a", "b"]), named(&["c"])]),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    assert_eq!(ids(&resources), vec!["a", "b", "c"]);
    assert_eq!(harness.reader.calls(), 3);
    assert!(resources
        .iter()
        .all(|r| r.resource_type() == "google_compute_network"));

    let cursors: Vec<_> = harness.api.requests().into_iter().map(|(_, c)| c).collect();
    assert_eq!(cursors, vec![None, Some("page-1".to_string())]);
}

/// A refused listing hides the type behind exactly one alert
#[tokio::test]
async fn test_forbidden_listing_degrades_to_alert() {
    let harness = Harness::new(
        MockListApi::new().failing(NETWORKS, 403),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let resources = assert_ok!(supplier.resources().await);
    assert!(resources.is_empty());
    assert_eq!(harness.reader.calls(), 0);

    let alerts = harness.ctx.alerter.retrieve();
    assert_eq!(alerts.len(), 1);
    assert_eq!(
        alerts["google_compute_network"],
        vec![Alert::new(
            "Ignoring google_compute_network from drift calculation: Listing google_compute_network is forbidden.",
            true
        )]
    );
}

/// Every supplier kind degrades the same way when nothing may be listed
#[tokio::test]
async fn test_every_supplier_degrades_on_forbidden_listing() {
    let harness = Harness::new(
        MockListApi::new().failing_everything(403),
        MockStateReader::echo(),
    );

    let suppliers = build_suppliers(&harness.ctx).unwrap();
    assert_eq!(suppliers.len(), 10);
    for supplier in &suppliers {
        let resources = supplier.resources().await.unwrap();
        assert!(resources.is_empty(), "{} returned resources", supplier.resource_type());
    }

    let alerts = harness.ctx.alerter.retrieve();
    for supplier in &suppliers {
        let type_alerts = &alerts[supplier.resource_type()];
        assert_eq!(type_alerts.len(), 1, "{}", supplier.resource_type());
        assert!(type_alerts[0].should_ignore_resource);
        assert!(type_alerts[0].message.ends_with("is forbidden."));
    }
    assert_eq!(harness.reader.calls(), 0);
}

/// A server error while listing fails the supplier
#[tokio::test]
async fn test_listing_server_error_propagates() {
    let harness = Harness::new(
        MockListApi::new().failing(NETWORKS, 500),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let err = assert_err!(supplier.resources().await);
    assert_eq!(err.status(), Some(500));
    assert!(harness.ctx.alerter.retrieve().is_empty());
}

/// One failed read among several fails the supplier with that error
#[tokio::test]
async fn test_one_failed_read_fails_supplier() {
    let harness = Harness::new(
        MockListApi::new().with_pages(NETWORKS, vec![named(&["a"]), named(&["b"])]),
        MockStateReader::new(|args| {
            if args.id == "b" {
                Err(Error::api(502, "mock://b", "bad gateway"))
            } else {
                Ok(echo_value(args))
            }
        }),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let err = assert_err!(supplier.resources().await);
    assert_eq!(err.status(), Some(502));
}

/// One identifier whose read fails with a non-auth error fails the supplier
#[tokio::test]
async fn test_read_failure_is_a_hard_error() {
    let harness = Harness::new(
        MockListApi::new().with_items(NETWORKS, named(&["default"])),
        MockStateReader::failing(500),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let err = assert_err!(supplier.resources().await);
    assert_eq!(err.status(), Some(500));
    assert!(harness.ctx.alerter.retrieve().is_empty());
}

/// A refused read hides a type whose permissions are project-wide
#[tokio::test]
async fn test_forbidden_read_ignores_type() {
    let zone = "https://www.googleapis.com/compute/v1/projects/test-project/zones/us-central1-a";
    let harness = Harness::new(
        MockListApi::new().with_items(
            DISKS,
            vec![json!({"name": "data-1", "zone": zone}), json!({"name": "data-2", "zone": zone})],
        ),
        MockStateReader::failing(403),
    );
    let supplier = ListingSupplier::<ComputeDisk>::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    assert!(resources.is_empty());

    let alerts = harness.ctx.alerter.retrieve();
    assert_eq!(
        alerts["google_compute_disk"],
        vec![Alert::new(
            "Ignoring google_compute_disk from drift calculation: Reading google_compute_disk is forbidden.",
            true
        )]
    );
}

/// Zonal resources are read with the short zone name
#[tokio::test]
async fn test_instances_carry_zone_attribute() {
    let harness = Harness::new(
        MockListApi::new().with_items(
            INSTANCES,
            vec![json!({
                "name": "web-1",
                "zone": "https://www.googleapis.com/compute/v1/projects/test-project/zones/europe-west1-b"
            })],
        ),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ComputeInstance>::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    match &resources[..] {
        [GoogleResource::ComputeInstance(instance)] => {
            assert_eq!(instance.id, "web-1");
            assert_eq!(instance.zone.as_deref(), Some("europe-west1-b"));
        },
        other => panic!("unexpected resources: {:?}", other),
    }
}

/// Buckets without notifications never reach the inventory
#[tokio::test]
async fn test_notifications_without_configuration_are_dropped() {
    let harness = Harness::new(
        MockListApi::new().with_items(BUCKETS, named(&["assets", "logs", "uploads"])),
        MockStateReader::new(|args| {
            let value = if args.id == "uploads" {
                json!({
                    "id": args.id,
                    "kind": "storage#notifications",
                    "items": [{
                        "id": "1",
                        "topic": "//pubsub.googleapis.com/projects/test-project/topics/uploads",
                        "payload_format": "JSON_API_V1"
                    }]
                })
            } else {
                json!({"id": args.id, "kind": "storage#notifications"})
            };
            Ok(NormalizedValue::from(value))
        }),
    );
    let supplier = ListingSupplier::<StorageBucketNotification>::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    assert_eq!(harness.reader.calls(), 3);
    assert_eq!(ids(&resources), vec!["uploads"]);
}

/// Notification reads are bucket-scoped, so a refused one fails the scan
#[tokio::test]
async fn test_forbidden_notification_read_fails() {
    let harness = Harness::new(
        MockListApi::new().with_items(BUCKETS, named(&["assets"])),
        MockStateReader::failing(403),
    );
    let supplier = ListingSupplier::<StorageBucketNotification>::new(harness.ctx.clone()).unwrap();

    let err = assert_err!(supplier.resources().await);
    assert!(err.is_forbidden());
    assert!(harness.ctx.alerter.retrieve().is_empty());
}

/// A refused bucket listing names buckets as the forbidden type
#[tokio::test]
async fn test_notification_listing_forbidden_names_buckets() {
    let harness = Harness::new(
        MockListApi::new().failing(BUCKETS, 403),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<StorageBucketNotification>::new(harness.ctx.clone()).unwrap();

    assert!(supplier.resources().await.unwrap().is_empty());
    assert_eq!(
        harness.ctx.alerter.retrieve()["google_storage_bucket_notification"][0].message,
        "Ignoring google_storage_bucket_notification from drift calculation. Listing google_storage_bucket is forbidden."
    );
}

/// Record sets are collected across zones under composite identifiers
#[tokio::test]
async fn test_record_sets_get_composite_ids() {
    let harness = Harness::new(
        MockListApi::new()
            .with_items(ZONES, named(&["prod", "staging"]))
            .with_pages(
                "projects/test-project/managedZones/prod/rrsets",
                vec![
                    vec![json!({"name": "Example.com.", "type": "A"})],
                    vec![json!({"name": "www.example.com.", "type": "CNAME"})],
                ],
            )
            .with_items(
                "projects/test-project/managedZones/staging/rrsets",
                vec![json!({"name": "example.com.", "type": "A"})],
            ),
        MockStateReader::echo(),
    );
    let supplier = DnsRecordSetSupplier::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    assert_eq!(
        ids(&resources),
        vec![
            "prod_example.com_A",
            "prod_www.example.com_CNAME",
            "staging_example.com_A",
        ]
    );

    let mut zones: Vec<_> = harness
        .reader
        .reads()
        .into_iter()
        .map(|args| args.attributes["managedZone"].clone())
        .collect();
    zones.sort();
    assert_eq!(zones, vec!["prod", "prod", "staging"]);

    for resource in &resources {
        let GoogleResource::DnsRecordSet(record) = resource else {
            panic!("unexpected resource {:?}", resource);
        };
        assert!(record.id.starts_with(&record.managed_zone));
    }
}

/// A refused zone listing names zones as the forbidden type
#[tokio::test]
async fn test_record_sets_forbidden_zone_listing() {
    let harness = Harness::new(MockListApi::new().failing(ZONES, 403), MockStateReader::echo());
    let supplier = DnsRecordSetSupplier::new(harness.ctx.clone()).unwrap();

    assert!(supplier.resources().await.unwrap().is_empty());
    assert_eq!(
        harness.ctx.alerter.retrieve()["google_dns_record_set"],
        vec![Alert::new(
            "Ignoring google_dns_record_set from drift calculation. Listing google_dns_managed_zone is forbidden.",
            true
        )]
    );
}

/// A refused record listing in one zone hides record sets of every zone
#[tokio::test]
async fn test_record_sets_forbidden_in_one_zone() {
    let harness = Harness::new(
        MockListApi::new()
            .with_items(ZONES, named(&["prod", "staging"]))
            .with_items(
                "projects/test-project/managedZones/prod/rrsets",
                vec![json!({"name": "example.com.", "type": "A"})],
            )
            .failing("projects/test-project/managedZones/staging/rrsets", 403),
        MockStateReader::echo(),
    );
    let supplier = DnsRecordSetSupplier::new(harness.ctx.clone()).unwrap();

    assert!(supplier.resources().await.unwrap().is_empty());
    assert_eq!(harness.reader.calls(), 0);
    assert_eq!(
        harness.ctx.alerter.retrieve()["google_dns_record_set"][0].message,
        "Ignoring google_dns_record_set from drift calculation: Listing google_dns_record_set is forbidden."
    );
}

/// Service accounts are identified by email
#[tokio::test]
async fn test_service_accounts_by_email() {
    let harness = Harness::new(
        MockListApi::new().with_items(
            ACCOUNTS,
            vec![json!({
                "name": "projects/test-project/serviceAccounts/ci@test-project.iam.gserviceaccount.com",
                "email": "ci@test-project.iam.gserviceaccount.com"
            })],
        ),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ServiceAccount>::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    assert_eq!(ids(&resources), vec!["ci@test-project.iam.gserviceaccount.com"]);
}

/// Keys come from one unpaged call per account
#[tokio::test]
async fn test_service_account_keys_are_listed_unpaged() {
    let email = "ci@test-project.iam.gserviceaccount.com";
    let key_name = |id: &str| format!("projects/test-project/serviceAccounts/{}/keys/{}", email, id);
    let harness = Harness::new(
        MockListApi::new()
            .with_items(ACCOUNTS, vec![json!({ "email": email })])
            .with_pages(
                "projects/test-project/serviceAccounts/ci%40test-project.iam.gserviceaccount.com/keys",
                vec![
                    vec![json!({"name": key_name("k1")}), json!({"name": key_name("k2")})],
                    vec![json!({"name": key_name("never-read")})],
                ],
            ),
        MockStateReader::echo(),
    );
    let supplier = ServiceAccountKeySupplier::new(harness.ctx.clone()).unwrap();

    let resources = supplier.resources().await.unwrap();
    assert_eq!(ids(&resources), vec!["k1", "k2"]);

    for args in harness.reader.reads() {
        assert_eq!(args.attributes["serviceAccount"], email);
    }
    assert!(harness.api.requests().iter().all(|(_, cursor)| cursor.is_none()));
}

/// A value that is not a map is a deserialization error
#[tokio::test]
async fn test_malformed_value_is_a_deserialize_error() {
    let harness = Harness::new(
        MockListApi::new().with_items(NETWORKS, named(&["default"])),
        MockStateReader::new(|_| Ok(NormalizedValue::String("default".to_string()))),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let err = assert_err!(supplier.resources().await);
    assert!(matches!(err, Error::Deserialize { .. }));
}

/// A listed item lacking its identifier field is rejected before any read
#[tokio::test]
async fn test_listed_item_without_identifier() {
    let harness = Harness::new(
        MockListApi::new().with_items(NETWORKS, vec![json!({"selfLink": "x"})]),
        MockStateReader::echo(),
    );
    let supplier = ListingSupplier::<ComputeNetwork>::new(harness.ctx.clone()).unwrap();

    let err = assert_err!(supplier.resources().await);
    assert!(matches!(err, Error::Listing { .. }));
    assert_eq!(harness.reader.calls(), 0);
}
