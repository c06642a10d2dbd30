//! Store behaviour shared by the SQLite and PostgreSQL test suites

#![allow(dead_code)]

use core_kernel::ClaimId;
use domain_claims::claim::ExtractedFields;
use domain_claims::ports::{HistoryQuery, HistoryStore};
use domain_claims::recommendation::{Priority, Recommendation};

pub fn fields(loss_type: &str, severity: &str, estimated_loss: &str) -> ExtractedFields {
    ExtractedFields {
        loss_type: Some(loss_type.to_string()),
        severity: Some(severity.to_string()),
        affected_assets: Some("Vehicle".to_string()),
        estimated_loss: Some(estimated_loss.to_string()),
        incident_date: Some("2026-10-01".to_string()),
        location: Some("Springfield".to_string()),
        confidence: Some("High".to_string()),
        extraction_explanation: Some("Stated in the claim".to_string()),
    }
}

pub fn recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new("Schedule inspection", Priority::Low, "Routine", "🔍", "Standard flow"),
        Recommendation::new("Escalate to supervisor", Priority::Critical, "Escalation", "🚨", "Large loss"),
        Recommendation::new("Verify policy", Priority::High, "Verification", "📋", "Coverage check"),
    ]
}

pub async fn save_and_get(store: &dyn HistoryStore) {
    let id = store
        .save("My car was hit at the junction", &fields("Auto Collision", "Medium", "$4,000"))
        .await
        .unwrap();

    let record = store.get_by_id(id).await.unwrap().expect("saved record");
    assert_eq!(record.id, id);
    assert_eq!(record.claim_text, "My car was hit at the junction");
    assert_eq!(record.fields.loss_type, "Auto Collision");
    assert_eq!(record.fields.estimated_loss, "$4,000");
    assert_eq!(record.fields.severity.as_str(), "Medium");
}

pub async fn missing_fields_stored_as_sentinels(store: &dyn HistoryStore) {
    let id = store.save("Something happened", &ExtractedFields::default()).await.unwrap();
    let record = store.get_by_id(id).await.unwrap().unwrap();

    assert_eq!(record.fields.loss_type, "Unknown");
    assert_eq!(record.fields.location, "Not specified");
    assert_eq!(record.fields.extraction_explanation, "");
}

pub async fn unknown_id_is_absent(store: &dyn HistoryStore) {
    assert!(store.get_by_id(ClaimId::new(987_654)).await.unwrap().is_none());
    assert!(!store.delete(ClaimId::new(987_654)).await.unwrap());
}

pub async fn list_newest_first(store: &dyn HistoryStore) {
    let first = store.save("first claim", &fields("Fire", "Low", "$100")).await.unwrap();
    let second = store.save("second claim", &fields("Fire", "Low", "$200")).await.unwrap();
    let third = store.save("third claim", &fields("Fire", "Low", "$300")).await.unwrap();

    let all = store.list(10).await.unwrap();
    let ids: Vec<ClaimId> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third, second, first]);

    let limited = store.list(2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, third);
}

pub async fn search_by_keyword_and_severity(store: &dyn HistoryStore) {
    store.save("Kitchen FIRE spread to the garage", &fields("Fire", "High", "$30,000")).await.unwrap();
    store.save("Basement flood after storm", &fields("Water Damage", "Medium", "$8,000")).await.unwrap();
    store.save("Small fire in the bin", &fields("Fire", "Low", "$200")).await.unwrap();

    let fires = store.search(&HistoryQuery::new().keyword("fire")).await.unwrap();
    assert_eq!(fires.len(), 2);

    let severe_fires = store
        .search(&HistoryQuery::new().keyword("fire").severity("High"))
        .await
        .unwrap();
    assert_eq!(severe_fires.len(), 1);
    assert_eq!(severe_fires[0].claim_text, "Kitchen FIRE spread to the garage");

    let blank = store.search(&HistoryQuery::new().keyword("   ")).await.unwrap();
    assert_eq!(blank.len(), 3);
}

pub async fn search_treats_wildcards_literally(store: &dyn HistoryStore) {
    store.save("Discount of 50% applied", &fields("Other", "Low", "$50")).await.unwrap();
    store.save("Discount of 50 dollars", &fields("Other", "Low", "$50")).await.unwrap();

    let hits = store.search(&HistoryQuery::new().keyword("50%")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].claim_text, "Discount of 50% applied");

    let underscores = store.search(&HistoryQuery::new().keyword("_")).await.unwrap();
    assert!(underscores.is_empty());
}

pub async fn delete_cascades_to_recommendations(store: &dyn HistoryStore) {
    let id = store.save("Roof damage", &fields("Storm", "High", "$12,000")).await.unwrap();
    store.save_recommendations(id, &recommendations()).await.unwrap();
    assert!(store.has_recommendations(id).await.unwrap());

    assert!(store.delete(id).await.unwrap());
    assert!(store.get_by_id(id).await.unwrap().is_none());
    assert!(!store.has_recommendations(id).await.unwrap());
    assert!(store.get_recommendations(id).await.unwrap().is_empty());
}

pub async fn recommendations_ordered_by_priority(store: &dyn HistoryStore) {
    let id = store.save("Theft of laptop", &fields("Theft", "Medium", "$1,500")).await.unwrap();
    assert_eq!(store.save_recommendations(id, &recommendations()).await.unwrap(), 3);

    let stored = store.get_recommendations(id).await.unwrap();
    let priorities: Vec<Priority> = stored.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![Priority::Critical, Priority::High, Priority::Low]);
    assert_eq!(stored[0].icon, "🚨");
}

pub async fn replace_recommendations_swaps_set(store: &dyn HistoryStore) {
    let id = store.save("Burst pipe", &fields("Water Damage", "Medium", "$3,000")).await.unwrap();
    store.save_recommendations(id, &recommendations()).await.unwrap();

    let replacement = vec![Recommendation::new(
        "Standard Claim Processing",
        Priority::Medium,
        "Processing",
        "📄",
        "No special handling",
    )];
    assert_eq!(store.replace_recommendations(id, &replacement).await.unwrap(), 1);

    let stored = store.get_recommendations(id).await.unwrap();
    assert_eq!(stored, replacement);

    assert_eq!(store.delete_recommendations(id).await.unwrap(), 1);
    assert!(!store.has_recommendations(id).await.unwrap());
}

pub async fn recommendations_for_missing_claim_rejected(store: &dyn HistoryStore) {
    let result = store.save_recommendations(ClaimId::new(424_242), &recommendations()).await;
    assert!(result.is_err());
}

pub async fn clear_all_empties_history(store: &dyn HistoryStore) {
    let id = store.save("one", &fields("Fire", "Low", "$1")).await.unwrap();
    store.save_recommendations(id, &recommendations()).await.unwrap();
    store.save("two", &fields("Fire", "Low", "$2")).await.unwrap();

    assert_eq!(store.clear_all().await.unwrap(), 2);
    assert!(store.list(10).await.unwrap().is_empty());
    assert!(!store.has_recommendations(id).await.unwrap());

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_claims, 0);
    assert!(stats.last_claim_at.is_none());
}

pub async fn stats_and_analytics(store: &dyn HistoryStore) {
    store.save("a", &fields("Fire", "High", "$10,000")).await.unwrap();
    store.save("b", &fields("Fire", "Critical", "$90,000")).await.unwrap();
    store.save("c", &fields("Theft", "High", "Not specified")).await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_claims, 3);
    assert_eq!(stats.severity_breakdown.get("High"), Some(&2));
    assert_eq!(stats.severity_breakdown.get("Critical"), Some(&1));
    assert!(stats.last_claim_at.is_some());

    let analytics = store.analytics().await.unwrap();
    assert_eq!(analytics.total_claims, 3);
    assert_eq!(analytics.most_common_loss_type(), Some("Fire"));
    assert_eq!(analytics.most_common_severity(), Some("High"));

    let severity_labels: Vec<&str> = analytics
        .severity_distribution
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(severity_labels, vec!["Critical", "High"]);

    assert_eq!(analytics.claims_over_time.iter().map(|d| d.count).sum::<u64>(), 3);
    assert_eq!(analytics.estimated_losses.len(), 2);
    assert_eq!(analytics.average_estimated_loss(), Some(50_000.0));
    assert!((analytics.high_confidence_share() - 100.0).abs() < f64::EPSILON);
    assert!(analytics.first_claim_at <= analytics.last_claim_at);
}

pub async fn empty_analytics(store: &dyn HistoryStore) {
    let analytics = store.analytics().await.unwrap();
    assert!(analytics.is_empty());
    assert!(analytics.claims_over_time.is_empty());
    assert_eq!(analytics.most_common_severity(), None);
    assert_eq!(analytics.average_estimated_loss(), None);
}
