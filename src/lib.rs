//! Unit-test harness for agent-based monitoring check plugins.
//!
//! Lets check and inventory functions be exercised outside of the full
//! monitoring core: raw agent output (`<<<section>>>` headers plus tabular
//! lines) is parsed into the nested token lists checks expect, check
//! metadata lives in an explicit [`CheckEnv`] that test code populates and
//! may override, and heterogeneous check return shapes are normalized into
//! one canonical [`CheckResult`].

pub mod env;
pub mod errors;
pub mod fixture;
pub mod harness;
pub mod logging;
pub mod result;
pub mod section;

pub use env::{CheckEnv, CheckFn, CheckInfo, InventoryFn, ParseFn};
pub use errors::HarnessError;
pub use harness::{Check, CheckFile};
pub use result::{CheckResult, Metric, RawResult, Status, SubResult};
pub use section::{is_header, parse_header, parse_section, ParsedSection, SectionHeader};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;

    const SERVICES_OUTPUT: &str = "\
<<<services:sep(59)>>>
sshd;active
cron;active
postgres;failed
";

    /// Check file as a loader would assemble it from a check script: a
    /// parse function turning rows into a name -> state map, an inventory
    /// function proposing every listed service, and a check function
    /// comparing actual against expected state.
    fn services_file() -> CheckFile {
        let mut env = CheckEnv::new();
        env.set_factory_settings("services", json!({"expected_state": "active"}));
        env.register(
            "services",
            CheckInfo::new("Service %s")
                .with_parse_function(|rows| {
                    let mut parsed = serde_json::Map::new();
                    for row in rows.as_array().cloned().unwrap_or_default() {
                        if let (Some(name), Some(state)) =
                            (row.get(0).and_then(Value::as_str), row.get(1).cloned())
                        {
                            parsed.insert(name.to_string(), state);
                        }
                    }
                    Value::Object(parsed)
                })
                .with_inventory_function(|parsed| {
                    let items: Vec<Value> = parsed
                        .as_object()
                        .map(|entries| entries.keys().cloned().map(Value::String).collect())
                        .unwrap_or_default();
                    Value::Array(items)
                })
                .with_check_function(|item, params, parsed| {
                    let Some(item) = item else {
                        return RawResult::Single(SubResult::new(Status::UNKNOWN, "no item given"));
                    };
                    let expected = params["expected_state"].as_str().unwrap_or("active");
                    match parsed.get(item).and_then(Value::as_str) {
                        Some(state) if state == expected => RawResult::Multi(vec![
                            SubResult::new(Status::OK, format!("state is {state}")),
                            SubResult::silent(Status::OK)
                                .with_perfdata(vec![Metric::new("up", 1.0)]),
                        ]),
                        Some(state) => RawResult::Multi(vec![
                            SubResult::new(
                                Status::CRIT,
                                format!("state is {state}, expected {expected}"),
                            ),
                            SubResult::silent(Status::OK)
                                .with_perfdata(vec![Metric::new("up", 0.0)]),
                        ]),
                        None => {
                            RawResult::Single(SubResult::new(Status::UNKNOWN, "service not found"))
                        }
                    }
                }),
        );

        CheckFile::new("services", env)
    }

    #[test]
    fn inventory_proposes_all_listed_services() {
        logging::init();
        let file = services_file();
        let check = file.check("services").expect("check handle");

        // inventory_mk applies the declared parse function first, so the
        // inventory function sees the name -> state map.
        let parsed = check
            .inventory_mk(json!([["sshd", "active"], ["postgres", "failed"]]))
            .expect("inventory runs");
        assert_eq!(parsed, json!(["postgres", "sshd"]));
    }

    #[test]
    fn healthy_service_checks_ok_with_perfdata() {
        logging::init();
        let file = services_file();
        let check = file.check("services").expect("check handle");

        let params = file
            .env()
            .factory_settings("services")
            .cloned()
            .expect("factory settings registered");
        let result = check
            .check_mk(
                Some("sshd"),
                &params,
                json!({"sshd": "active", "postgres": "failed"}),
            )
            .expect("check runs");

        assert_eq!(result.status, Status::OK);
        assert_eq!(result.summary, "state is active");
        assert_eq!(result.perfdata, vec![Metric::new("up", 1.0)]);
    }

    #[test]
    fn failed_service_checks_crit_after_explicit_parse() {
        logging::init();
        let file = services_file();
        let check = file.check("services").expect("check handle");

        // check_mk applies the declared parse function before handing the
        // data to the check function.
        let rows = json!([["sshd", "active"], ["postgres", "failed"]]);
        let result = check
            .check_mk(Some("postgres"), &json!({"expected_state": "active"}), rows)
            .expect("check runs");

        assert_eq!(result.status, Status::CRIT);
        assert_eq!(result.summary, "state is failed, expected active");
        assert_eq!(result.perfdata, vec![Metric::new("up", 0.0)]);
    }

    #[test]
    fn plugin_text_round_trip_matches_core_input() {
        logging::init();
        let file = services_file();
        let check = file.check("services").expect("check handle");

        let section = parse_section(SERVICES_OUTPUT.trim()).expect("fixture parses");
        assert_eq!(section.name, "services");
        assert_eq!(section.rows.len(), 3);

        let from_text = check
            .inventory(SERVICES_OUTPUT)
            .expect("inventory over plugin text");
        // inventory() skips the parse function, so the inventory function
        // receives raw rows and proposes nothing map-shaped; inventory_mk
        // parses first and yields the real item list.
        assert_eq!(from_text, json!([]));

        let from_core = check
            .inventory_mk(json!(section.rows))
            .expect("inventory over core input");
        assert_eq!(from_core, json!(["cron", "postgres", "sshd"]));
    }

    #[test]
    fn wrong_fixture_section_names_both_sides() {
        logging::init();
        let file = services_file();
        let check = file.check("services").expect("check handle");

        let error = check
            .check(Some("sshd"), &json!({}), "<<<processes>>>\n1 sshd")
            .expect_err("expected mismatch");
        assert_eq!(
            error.to_string(),
            "wrong section name: expected \"services\", got \"processes\""
        );
    }

    #[test]
    fn metadata_is_visible_through_the_handle() {
        let file = services_file();
        let check = file.check("services").expect("check handle");

        assert_eq!(
            check.service_description().expect("metadata"),
            "Service %s"
        );
        assert!(!check.has_perfdata().expect("metadata"));
    }
}
