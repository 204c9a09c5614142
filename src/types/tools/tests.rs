use super::*;
use serde_json::json;

#[test]
fn descriptor_from_config_keeps_options_undecoded() {
    let tool: ToolDescriptor = serde_json::from_value(json!({
        "name": "openai.shell",
        "providerExecuted": true,
        "providerOptions": {"environment": {"type": "container_reference", "containerId": "c1"}}
    }))
    .unwrap();

    assert_eq!(tool.name, "openai.shell");
    assert!(tool.provider_executed);
    assert!(!tool.strict);
    assert_eq!(tool.description, "");
    assert_eq!(tool.parameters, json!({"type": "object", "properties": {}}));
    assert!(matches!(tool.provider_options, ToolProviderOptions::Json(_)));
}

#[test]
fn null_or_missing_options_are_none() {
    let tool: ToolDescriptor =
        serde_json::from_value(json!({"name": "f", "providerOptions": null})).unwrap();
    assert!(tool.provider_options.is_none());

    let tool: ToolDescriptor = serde_json::from_value(json!({"name": "f"})).unwrap();
    assert!(tool.provider_options.is_none());
}

#[test]
fn typed_options_serialize_in_camel_case() {
    let tool = ToolDescriptor::provider_defined("openai.shell").with_provider_options(
        ShellToolOptions {
            environment: Some(ShellEnvironment::ContainerAuto {
                file_ids: Some(vec!["f1".into()]),
                memory_limit: Some(MemoryLimit::Gb1),
                network_policy: None,
                skills: None,
            }),
        },
    );

    let value = serde_json::to_value(&tool).unwrap();
    assert_eq!(
        value["providerOptions"],
        json!({"environment": {"type": "container_auto", "fileIds": ["f1"], "memoryLimit": "1g"}})
    );
    assert_eq!(value["providerExecuted"], true);
}

#[test]
fn serialized_descriptor_round_trips_through_json_options() {
    let original = ToolDescriptor::provider_defined("openai.custom")
        .with_provider_options(CustomToolOptions::new("calc"));
    let decoded: ToolDescriptor =
        serde_json::from_value(serde_json::to_value(&original).unwrap()).unwrap();

    assert_eq!(decoded.name, original.name);
    assert_eq!(
        decoded.provider_options,
        ToolProviderOptions::Json(json!({"name": "calc"}))
    );
}

#[test]
fn function_descriptor_omits_empty_options() {
    let tool = ToolDescriptor::function("f", "does f", json!({"type": "object"}));
    let value = serde_json::to_value(&tool).unwrap();
    assert!(value.get("providerOptions").is_none());
    assert_eq!(value["strict"], false);
}

#[test]
fn inline_skill_source_defaults_to_zip() {
    let skill: ContainerSkill = serde_json::from_value(json!({
        "type": "inline",
        "name": "csv",
        "description": "CSV helpers",
        "source": {"data": "UEsDBA=="}
    }))
    .unwrap();

    match skill {
        ContainerSkill::Inline { source, .. } => assert_eq!(source.media_type, "application/zip"),
        other => panic!("expected inline skill, got {other:?}"),
    }
}

#[test]
fn memory_limit_strings() {
    assert_eq!(MemoryLimit::Gb64.as_str(), "64g");
    assert_eq!(serde_json::to_value(MemoryLimit::Gb4).unwrap(), json!("4g"));
}

#[test]
fn skill_reference_uses_snake_case_tag() {
    let skill = ContainerSkill::SkillReference {
        skill_id: "s1".into(),
        version: Some("2".into()),
    };
    let value = serde_json::to_value(&skill).unwrap();
    assert_eq!(
        value,
        json!({"type": "skill_reference", "skillId": "s1", "version": "2"})
    );
    assert_eq!(serde_json::from_value::<ContainerSkill>(value).unwrap(), skill);
}
