// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for the `windns_record` lifecycle.

#[cfg(test)]
mod tests {
    use crate::backend::DnsBackend;
    use crate::errors::WinDnsError;
    use crate::record::{decode, DnsRecord, RecordChange, RecordType};
    use crate::resource::{RecordResource, RecordSpec};
    use crate::testing::{MemoryBackend, Op};

    const ZONE: &str = "example.com";

    fn spec(name: &str, record_type: RecordType, records: &[&str]) -> RecordSpec {
        RecordSpec {
            name: name.to_string(),
            zone_name: ZONE.to_string(),
            record_type,
            records: records.iter().map(ToString::to_string).collect(),
            create_ptr: false,
            ttl: None,
        }
    }

    fn resource() -> RecordResource<MemoryBackend> {
        RecordResource::new(MemoryBackend::new())
    }

    #[tokio::test]
    async fn test_create_a_record_round_trip() {
        let resource = resource();
        let spec = spec("acc-a", RecordType::A, &["203.0.113.11", "203.0.113.12"]);

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.id, "example.com:acc-a:A");
        assert_eq!(state.records, spec.records);
        assert_eq!(state.ttl, Some(3600));
        assert!(!state.create_ptr);

        let id = "example.com:acc-a:A".to_string();
        assert_eq!(
            resource.backend().ops(),
            vec![
                Op::Get(id.clone()),
                Op::Add(id.clone(), "203.0.113.11".to_string()),
                Op::Add(id.clone(), "203.0.113.12".to_string()),
                Op::Get(id),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_with_ptr_requests_reverse_records() {
        let resource = resource();
        let mut spec = spec("acc-ptr", RecordType::A, &["203.0.113.21"]);
        spec.create_ptr = true;

        let state = resource.create(&spec).await.unwrap();

        assert!(state.create_ptr);
        assert_eq!(resource.backend().ptr_created(), vec!["203.0.113.21"]);
    }

    #[tokio::test]
    async fn test_ptr_without_trailing_dot_has_no_diff() {
        let resource = resource();
        let spec = spec("21", RecordType::PTR, &["example-host.example.com"]);

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.records, vec!["example-host.example.com"]);
        let id = decode(&state.id).unwrap();
        assert_eq!(
            resource.backend().values(&id).unwrap(),
            vec!["example-host.example.com."]
        );
        assert_eq!(resource.plan(&spec).await.unwrap(), RecordChange::NoOp);
    }

    #[tokio::test]
    async fn test_ptr_with_trailing_dot_has_no_diff() {
        let resource = resource();
        let spec = spec("22", RecordType::PTR, &["example-host.example.com."]);

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.records, vec!["example-host.example.com."]);
        assert_eq!(resource.plan(&spec).await.unwrap(), RecordChange::NoOp);
    }

    #[tokio::test]
    async fn test_uppercase_aaaa_has_no_diff() {
        let resource = resource();
        let spec = spec("acc-aaaa", RecordType::AAAA, &["2001:DB8::1", "2001:db8::2"]);

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.records, spec.records);
        assert_eq!(resource.plan(&spec).await.unwrap(), RecordChange::NoOp);
    }

    #[tokio::test]
    async fn test_txt_special_characters_round_trip() {
        let resource = resource();
        let spec = spec(
            "acc-txt",
            RecordType::TXT,
            &["TxTdATa9 &!#$%&'()*+,-./:;<=>?@[]^_{|}~"],
        );

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.records, spec.records);
        assert_eq!(resource.plan(&spec).await.unwrap(), RecordChange::NoOp);
    }

    #[tokio::test]
    async fn test_cname_round_trip() {
        let resource = resource();
        let spec = spec("acc-cname", RecordType::CNAME, &["target.example.com"]);

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.records, vec!["target.example.com"]);
        assert_eq!(resource.plan(&spec).await.unwrap(), RecordChange::NoOp);
    }

    #[tokio::test]
    async fn test_cname_with_multiple_values_rejected() {
        let resource = resource();
        let spec = spec("acc-cname", RecordType::CNAME, &["a.example.com", "b.example.com"]);

        let err = resource.create(&spec).await.unwrap_err();

        assert!(matches!(err, WinDnsError::InvalidRecordData { .. }));
        assert!(resource.backend().ops().is_empty());
    }

    #[tokio::test]
    async fn test_illegal_zone_rejected_before_any_remote_call() {
        let resource = resource();
        let mut spec = spec("acc-illegal", RecordType::A, &["203.0.113.11"]);
        spec.zone_name = "example.com;".to_string();

        let err = resource.create(&spec).await.unwrap_err();

        assert!(matches!(err, WinDnsError::InvalidCharacters { .. }));
        assert!(err
            .to_string()
            .contains("invalid characters detected in input"));
        assert!(resource.backend().ops().is_empty());
    }

    #[tokio::test]
    async fn test_illegal_id_rejected_before_any_remote_call() {
        let resource = resource();

        assert!(resource.read("example.com;:acc:A").await.is_err());
        assert!(resource.delete("example.com:acc$(x):A").await.is_err());
        assert!(resource.import("example.com:acc").await.is_err());
        assert!(resource.backend().ops().is_empty());
    }

    #[tokio::test]
    async fn test_create_refuses_existing_set() {
        let resource = resource();
        resource.backend().insert(&DnsRecord::new(
            ZONE,
            "taken",
            RecordType::A,
            vec!["203.0.113.1".to_string()],
        ));

        let err = resource
            .create(&spec("taken", RecordType::A, &["203.0.113.2"]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WinDnsError::AlreadyExists {
                id: "example.com:taken:A".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_update_touches_only_changed_values() {
        let resource = resource();
        let initial = spec("acc-multi", RecordType::A, &["203.0.113.11", "203.0.113.12"]);
        let state = resource.create(&initial).await.unwrap();
        resource.backend().clear_ops();

        let updated = spec(
            "acc-multi",
            RecordType::A,
            &["203.0.113.12", "203.0.113.13", "203.0.113.14"],
        );
        let state = resource.update(&state.id, &updated).await.unwrap();

        assert_eq!(state.records, updated.records);
        let id = state.id.clone();
        assert_eq!(
            resource.backend().ops(),
            vec![
                Op::Get(id.clone()),
                Op::Add(id.clone(), "203.0.113.13".to_string()),
                Op::Add(id.clone(), "203.0.113.14".to_string()),
                Op::Remove(id.clone(), "203.0.113.11".to_string()),
                Op::Get(id),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_leaves_sibling_records_alone() {
        let resource = resource();
        let sibling = DnsRecord::new(
            ZONE,
            "other",
            RecordType::A,
            vec!["198.51.100.1".to_string()],
        );
        resource.backend().insert(&sibling);

        let state = resource
            .create(&spec("mine", RecordType::A, &["203.0.113.11"]))
            .await
            .unwrap();
        resource
            .update(&state.id, &spec("mine", RecordType::A, &["203.0.113.99"]))
            .await
            .unwrap();

        let sibling_id = decode("example.com:other:A").unwrap();
        assert_eq!(
            resource.backend().values(&sibling_id).unwrap(),
            vec!["198.51.100.1"]
        );
    }

    #[tokio::test]
    async fn test_update_cname_target() {
        let resource = resource();
        let state = resource
            .create(&spec("www", RecordType::CNAME, &["a.example.com"]))
            .await
            .unwrap();
        resource.backend().clear_ops();

        let updated = spec("www", RecordType::CNAME, &["b.example.com"]);
        let state = resource.update(&state.id, &updated).await.unwrap();

        assert_eq!(state.records, vec!["b.example.com"]);
        let id = state.id.clone();
        assert_eq!(
            resource.backend().ops(),
            vec![
                Op::Get(id.clone()),
                Op::Remove(id.clone(), "a.example.com.".to_string()),
                Op::Add(id.clone(), "b.example.com".to_string()),
                Op::Get(id.clone()),
            ]
        );
        assert_eq!(
            resource.backend().values(&decode(&id).unwrap()).unwrap(),
            vec!["b.example.com."]
        );
        assert_eq!(resource.plan(&updated).await.unwrap(), RecordChange::NoOp);
    }

    #[tokio::test]
    async fn test_second_cname_at_node_rejected() {
        let resource = resource();
        let state = resource
            .create(&spec("www", RecordType::CNAME, &["a.example.com"]))
            .await
            .unwrap();
        let id = decode(&state.id).unwrap();

        let err = resource
            .backend()
            .add_value(&id, "b.example.com", None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, WinDnsError::RemoteCommand { .. }));
    }

    #[tokio::test]
    async fn test_uncompressed_aaaa_converges() {
        let resource = resource();
        let spec = spec("acc-aaaa-long", RecordType::AAAA, &["2001:db8:0:0::1"]);

        let state = resource.create(&spec).await.unwrap();

        assert_eq!(state.records, vec!["2001:db8:0:0::1"]);
        assert_eq!(
            resource.backend().values(&decode(&state.id).unwrap()).unwrap(),
            vec!["2001:db8::1"]
        );
        assert_eq!(resource.plan(&spec).await.unwrap(), RecordChange::NoOp);

        resource.backend().clear_ops();
        resource.update(&state.id, &spec).await.unwrap();
        assert!(resource
            .backend()
            .ops()
            .iter()
            .all(|op| matches!(op, Op::Get(_))));
    }

    #[tokio::test]
    async fn test_failed_create_rolls_back_added_values() {
        let resource = resource();
        // The server refuses the duplicate, after the first value went in
        let failing = spec("acc-partial", RecordType::A, &["203.0.113.11", "203.0.113.11"]);

        let err = resource.create(&failing).await.unwrap_err();

        assert!(matches!(err, WinDnsError::RemoteCommand { .. }));
        let id = "example.com:acc-partial:A".to_string();
        assert!(resource
            .backend()
            .ops()
            .contains(&Op::Remove(id.clone(), "203.0.113.11".to_string())));
        assert!(!resource.exists(&id).await.unwrap());

        let retry = spec("acc-partial", RecordType::A, &["203.0.113.11"]);
        assert!(resource.create(&retry).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_ttl_only() {
        let resource = resource();
        let mut spec = spec("acc-ttl", RecordType::TXT, &["hello"]);
        let state = resource.create(&spec).await.unwrap();
        resource.backend().clear_ops();

        spec.ttl = Some(300);
        let state = resource.update(&state.id, &spec).await.unwrap();

        assert_eq!(state.ttl, Some(300));
        let id = state.id.clone();
        assert_eq!(
            resource.backend().ops(),
            vec![Op::Get(id.clone()), Op::SetTtl(id.clone(), 300), Op::Get(id)]
        );
    }

    #[tokio::test]
    async fn test_update_with_no_changes_writes_nothing() {
        let resource = resource();
        let spec = spec("acc-same", RecordType::AAAA, &["2001:db8::1"]);
        let state = resource.create(&spec).await.unwrap();
        resource.backend().clear_ops();

        let mut upper = spec.clone();
        upper.records = vec!["2001:DB8::1".to_string()];
        resource.update(&state.id, &upper).await.unwrap();

        assert!(resource
            .backend()
            .ops()
            .iter()
            .all(|op| matches!(op, Op::Get(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_on_identity_change() {
        let resource = resource();
        let state = resource
            .create(&spec("old-name", RecordType::A, &["203.0.113.11"]))
            .await
            .unwrap();
        resource.backend().clear_ops();

        let state = resource
            .update(&state.id, &spec("new-name", RecordType::A, &["203.0.113.11"]))
            .await
            .unwrap();

        assert_eq!(state.id, "example.com:new-name:A");
        let ops = resource.backend().ops();
        assert_eq!(ops[0], Op::RemoveSet("example.com:old-name:A".to_string()));
        assert!(ops.contains(&Op::Add(
            "example.com:new-name:A".to_string(),
            "203.0.113.11".to_string()
        )));
        assert!(!resource.exists("example.com:old-name:A").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_set_is_not_found() {
        let resource = resource();
        let err = resource
            .update(
                "example.com:gone:A",
                &spec("gone", RecordType::A, &["203.0.113.11"]),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_then_exists_is_false() {
        let resource = resource();
        let state = resource
            .create(&spec("acc-del", RecordType::A, &["203.0.113.11"]))
            .await
            .unwrap();

        assert!(resource.exists(&state.id).await.unwrap());
        resource.delete(&state.id).await.unwrap();
        assert!(!resource.exists(&state.id).await.unwrap());

        // Deleting an absent set is tolerated
        resource.delete(&state.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_missing_set_returns_none() {
        let resource = resource();
        assert_eq!(resource.read("example.com:nothing:TXT").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_import_matches_created_state() {
        let resource = resource();
        let spec = spec("acc-import", RecordType::A, &["203.0.113.11", "203.0.113.12"]);
        let created = resource.create(&spec).await.unwrap();

        let imported = resource.import(&created.id).await.unwrap();

        assert_eq!(imported, created);
    }

    #[tokio::test]
    async fn test_import_uses_server_spelling() {
        let resource = resource();
        let spec = spec("23", RecordType::PTR, &["host.example.com"]);
        let created = resource.create(&spec).await.unwrap();

        let imported = resource.import(&created.id).await.unwrap();

        assert_eq!(imported.records, vec!["host.example.com."]);
        assert_eq!(imported.ttl, created.ttl);
        assert!(!imported.create_ptr);
    }

    #[tokio::test]
    async fn test_import_missing_set_is_error() {
        let resource = resource();
        let err = resource.import("example.com:nothing:A").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_refresh_keeps_prior_spelling() {
        let resource = resource();
        let mut spec = spec("24", RecordType::PTR, &["host.example.com"]);
        spec.create_ptr = true;
        let created = resource.create(&spec).await.unwrap();

        let refreshed = resource.refresh(&created).await.unwrap().unwrap();

        assert_eq!(refreshed, created);
    }

    #[tokio::test]
    async fn test_apply_creates_then_noops_then_updates() {
        let resource = resource();
        let mut spec = spec("acc-apply", RecordType::TXT, &["one"]);

        let (change, _) = resource.apply(&spec).await.unwrap();
        assert_eq!(change, RecordChange::Create);

        let (change, _) = resource.apply(&spec).await.unwrap();
        assert_eq!(change, RecordChange::NoOp);

        spec.records = vec!["two".to_string()];
        let (change, state) = resource.apply(&spec).await.unwrap();
        match change {
            RecordChange::Update(plan) => {
                assert_eq!(plan.add, vec!["two"]);
                assert_eq!(plan.remove, vec!["one"]);
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert_eq!(state.records, vec!["two"]);
    }

    #[test]
    fn test_spec_from_yaml() {
        let spec: RecordSpec = serde_yaml::from_str(
            r"
name: www
zone_name: example.com
type: aaaa
records:
  - 2001:db8::1
create_ptr: true
ttl: 1h
",
        )
        .unwrap();

        assert_eq!(spec.record_type, RecordType::AAAA);
        assert_eq!(spec.ttl, Some(3600));
        assert!(spec.create_ptr);
        assert_eq!(spec.validate().unwrap().to_string(), "example.com:www:AAAA");
    }

    #[test]
    fn test_spec_defaults() {
        let spec: RecordSpec = serde_yaml::from_str(
            "name: '@'\nzone_name: example.com\ntype: TXT\nrecords: [v=spf1 -all]\n",
        )
        .unwrap();

        assert!(!spec.create_ptr);
        assert_eq!(spec.ttl, None);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_spec_rejects_unknown_fields() {
        let result: Result<RecordSpec, _> = serde_yaml::from_str(
            "name: www\nzone_name: example.com\ntype: A\nrecords: [203.0.113.1]\nweight: 5\n",
        );
        assert!(result.is_err());
    }
}
