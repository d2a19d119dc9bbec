use crate::commands::db::{get_db_connection, load_document, store_document};
use crate::models::settings::{DashboardSettings, MAX_HORIZON_DAYS, MIN_HORIZON_DAYS};
use serde_json::{json, Map, Value};

const SETTINGS_SCHEMA_VERSION: i64 = 1;

/// Flat string keys the browser build kept in local storage.
const LEGACY_KEYS: [&str; 11] = [
    "cadence_mode",
    "cadence_stale_threshold",
    "cadence_team_velocity",
    "cadence_active_jql",
    "cadence_future_jql",
    "cadence_build_label",
    "cadence_story_point_field",
    "cadence_jira_board_id",
    "cadence_team_name",
    "cadence_team_members",
    "cadence_jira_host",
];

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn get_settings(data_dir: String) -> Result<Value, String> {
    load_settings(&data_dir)
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn save_settings(data_dir: String, settings: Value) -> Result<Value, String> {
    save_settings_to_store(&data_dir, settings)
}

/// Typed view of the stored settings, after migration and sanitizing.
pub fn load_effective_settings(data_dir: &str) -> Result<DashboardSettings, String> {
    let settings = load_settings(data_dir)?;
    serde_json::from_value(settings).map_err(|e| format!("Failed to decode settings: {e}"))
}

pub fn load_settings(data_dir: &str) -> Result<Value, String> {
    let conn = get_db_connection(data_dir)?;
    let original = load_document(&conn).map_err(|e| format!("Failed to read settings: {e}"))?;

    let migrated = migrate_settings(original.clone());
    if migrated != original {
        log::info!("settings migrated to schema v{SETTINGS_SCHEMA_VERSION}");
        store_document(&conn, &migrated).map_err(|e| format!("Failed to write settings: {e}"))?;
    }

    Ok(migrated)
}

pub fn save_settings_to_store(data_dir: &str, settings: Value) -> Result<Value, String> {
    let conn = get_db_connection(data_dir)?;

    // Never overwrite a store that could not be read.
    let mut merged = load_settings(data_dir)?;
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    store_document(&conn, &migrated).map_err(|e| format!("Failed to write settings: {e}"))?;
    log::debug!("settings saved to {data_dir}");
    Ok(migrated)
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        import_legacy_keys(&mut out);
    }

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    let mut defaults = serde_json::to_value(DashboardSettings::default()).unwrap_or_else(|_| json!({}));
    if let Some(obj) = defaults.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
        obj.insert("jiraHost".to_string(), Value::Null);
    }
    defaults
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

/// Move browser local-storage entries onto the structured keys. Legacy values
/// were stored as strings; numbers may already have been decoded.
fn import_legacy_keys(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    let mut legacy = Map::new();
    for key in LEGACY_KEYS {
        if let Some(value) = obj.remove(key) {
            legacy.insert(key.to_string(), value);
        }
    }
    if legacy.is_empty() {
        return;
    }

    let text = |key: &str| -> Option<String> {
        match legacy.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };
    let number = |key: &str| text(key).and_then(|s| s.trim().parse::<f64>().ok());

    if let Some(mode) = text("cadence_mode") {
        let mode = match mode.to_lowercase().as_str() {
            "jira" | "live" => "live",
            _ => "mock",
        };
        obj.insert("dataMode".to_string(), json!(mode));
    }
    if let Some(days) = number("cadence_stale_threshold") {
        obj.insert("staleThresholdDays".to_string(), json!(days.max(0.0) as u64));
    }
    if let Some(velocity) = number("cadence_team_velocity") {
        obj.insert("manualVelocity".to_string(), json!(velocity));
    }

    let string_keys = [
        ("cadence_active_jql", "activeWorkFilter"),
        ("cadence_future_jql", "futureIdeasFilter"),
        ("cadence_build_label", "buildLabel"),
        ("cadence_story_point_field", "storyPointField"),
        ("cadence_jira_board_id", "boardId"),
        ("cadence_team_name", "teamName"),
        ("cadence_jira_host", "jiraHost"),
    ];
    for (legacy_key, key) in string_keys {
        if let Some(value) = text(legacy_key) {
            obj.insert(key.to_string(), json!(value));
        }
    }

    match legacy.get("cadence_team_members") {
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(members) => {
                obj.insert("teamMembers".to_string(), members);
            }
            Err(e) => log::warn!("dropping unreadable legacy team members: {e}"),
        },
        Some(members @ Value::Array(_)) => {
            obj.insert("teamMembers".to_string(), members.clone());
        }
        _ => {}
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "staleThresholdDays", 1, 365, 30);
    sanitize_enum(obj, "dataMode", &["mock", "live"], "mock");
    sanitize_team_members(obj);

    for key in [
        "activeWorkFilter",
        "futureIdeasFilter",
        "completedWorkFilter",
        "buildLabel",
        "storyPointField",
        "boardId",
        "teamName",
    ] {
        ensure_string(obj, key);
    }

    // A manual override must be a usable throughput or absent.
    let manual = obj
        .get("manualVelocity")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0);
    obj.insert("manualVelocity".to_string(), json!(manual));

    let defaults = DashboardSettings::default();

    if let Some(velocity) = obj.get_mut("velocity").and_then(Value::as_object_mut) {
        clamp_f64(velocity, "fallbackPointsPerWeek", 0.1, 1000.0, defaults.velocity.fallback_points_per_week);
        clamp_f64(velocity, "fallbackDaysPerPoint", 0.1, 100.0, defaults.velocity.fallback_days_per_point);
    } else {
        obj.insert("velocity".to_string(), json!(defaults.velocity));
    }

    if let Some(projection) = obj.get_mut("projection").and_then(Value::as_object_mut) {
        let d = defaults.projection;
        clamp_f64(projection, "unestimatedPoints", 0.0, 100.0, d.unestimated_points);
        clamp_f64(projection, "minDailyThroughput", 0.01, 10.0, d.min_daily_throughput);
        clamp_f64(projection, "optimisticFactor", 1.0, 3.0, d.optimistic_factor);
        clamp_f64(projection, "pessimisticFactor", 0.1, 1.0, d.pessimistic_factor);
        clamp_u64(projection, "bufferDays", 0, 365, u64::from(d.buffer_days));
        clamp_u64(
            projection,
            "maxHorizonDays",
            u64::from(MIN_HORIZON_DAYS),
            u64::from(MAX_HORIZON_DAYS),
            u64::from(d.max_horizon_days),
        );
    } else {
        obj.insert("projection".to_string(), json!(defaults.projection));
    }
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn clamp_f64(map: &mut Map<String, Value>, key: &str, min: f64, max: f64, default: f64) {
    let raw = map
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .filter(|value| allowed.contains(&value.as_str()))
        .unwrap_or_else(|| default.to_string());
    map.insert(key.to_string(), json!(valid));
}

fn ensure_string(map: &mut Map<String, Value>, key: &str) {
    let value = match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    map.insert(key.to_string(), json!(value));
}

fn sanitize_team_members(map: &mut Map<String, Value>) {
    let members: Vec<Value> = map
        .get("teamMembers")
        .and_then(Value::as_array)
        .map(|members| {
            members
                .iter()
                .filter(|m| m.get("id").and_then(Value::as_str).is_some())
                .map(|m| {
                    json!({
                        "id": m.get("id").and_then(Value::as_str).unwrap_or_default(),
                        "name": m.get("name").and_then(Value::as_str).unwrap_or_default(),
                        "role": m.get("role").and_then(Value::as_str).unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    map.insert("teamMembers".to_string(), Value::Array(members));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_migrates_to_defaults() {
        let migrated = migrate_settings(json!({}));

        assert_eq!(migrated["schema_version"], json!(SETTINGS_SCHEMA_VERSION));
        assert_eq!(migrated["staleThresholdDays"], json!(30));
        assert_eq!(migrated["activeWorkFilter"], json!("statusCategory != Done"));
        assert_eq!(migrated["manualVelocity"], Value::Null);
        assert_eq!(migrated["projection"]["optimisticFactor"], json!(1.25));

        let typed: DashboardSettings = serde_json::from_value(migrated).expect("typed");
        assert_eq!(typed, DashboardSettings::default());
    }

    #[test]
    fn imports_legacy_local_storage_keys() {
        let input = json!({
            "cadence_mode": "JIRA",
            "cadence_stale_threshold": "14",
            "cadence_team_velocity": 12.5,
            "cadence_active_jql": "labels = build AND statusCategory != Done",
            "cadence_story_point_field": "customfield_10026",
            "cadence_team_members": "[{\"id\":\"u1\",\"name\":\"Alice\",\"role\":\"Dev\"}]"
        });

        let migrated = migrate_settings(input);

        assert_eq!(migrated["dataMode"], json!("live"));
        assert_eq!(migrated["staleThresholdDays"], json!(14));
        assert_eq!(migrated["manualVelocity"], json!(12.5));
        assert_eq!(
            migrated["activeWorkFilter"],
            json!("labels = build AND statusCategory != Done")
        );
        assert_eq!(migrated["storyPointField"], json!("customfield_10026"));
        assert_eq!(migrated["teamMembers"][0]["name"], json!("Alice"));
        assert!(migrated.get("cadence_mode").is_none());
    }

    #[test]
    fn clamps_out_of_range_tuning() {
        let migrated = migrate_settings(json!({
            "schema_version": 1,
            "staleThresholdDays": 0,
            "manualVelocity": -4,
            "projection": { "optimisticFactor": 9, "pessimisticFactor": 0, "bufferDays": 14 }
        }));

        assert_eq!(migrated["staleThresholdDays"], json!(1));
        assert_eq!(migrated["manualVelocity"], Value::Null);
        assert_eq!(migrated["projection"]["optimisticFactor"], json!(3.0));
        assert_eq!(migrated["projection"]["pessimisticFactor"], json!(0.1));
        assert_eq!(migrated["projection"]["minDailyThroughput"], json!(0.1));
        assert_eq!(migrated["projection"]["maxHorizonDays"], json!(3650));
    }

    #[test]
    fn clamps_projection_horizon_cap() {
        let migrated = migrate_settings(json!({
            "schema_version": 1,
            "projection": { "maxHorizonDays": 1_000_000 }
        }));
        assert_eq!(migrated["projection"]["maxHorizonDays"], json!(36_500));

        let migrated = migrate_settings(json!({
            "schema_version": 1,
            "projection": { "maxHorizonDays": 0 }
        }));
        assert_eq!(migrated["projection"]["maxHorizonDays"], json!(30));
    }

    #[test]
    fn merges_partial_settings_without_losing_existing_values() {
        let mut existing = default_settings();
        merge_settings(&mut existing, &json!({ "staleThresholdDays": 45, "velocity": { "fallbackPointsPerWeek": 8 } }));
        let migrated = migrate_settings(existing);

        assert_eq!(migrated["staleThresholdDays"], json!(45));
        assert_eq!(migrated["velocity"]["fallbackPointsPerWeek"], json!(8.0));
        assert_eq!(migrated["velocity"]["fallbackDaysPerPoint"], json!(5.0));
        assert_eq!(migrated["teamName"], json!("Core Team"));
    }
}
