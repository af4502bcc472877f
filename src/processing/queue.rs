//! Message queue planning: a main queue with an optional dead-letter redrive.

use super::vpc::stage_tags;
use crate::config::QueueSettings;
use crate::error::NetError;
use crate::models::{PolicyCondition, Queue, QueueAccessPolicy, QueuePlan, RedrivePolicy};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Provider limits for queue attributes.
pub const VISIBILITY_TIMEOUT_RANGE: RangeInclusive<u32> = 0..=43_200;
pub const MESSAGE_RETENTION_RANGE: RangeInclusive<u32> = 60..=1_209_600;
pub const MAX_RECEIVE_COUNT_RANGE: RangeInclusive<u32> = 1..=1_000;

/// Actions granted on the main queue to the owning account.
const ALLOWED_ACTIONS: [&str; 4] = [
    "sqs:SendMessage",
    "sqs:ReceiveMessage",
    "sqs:DeleteMessage",
    "sqs:GetQueueAttributes",
];

const ACCESS_POLICY_SID: &str = "AllowCurrentAccountAccess";
const SOURCE_ACCOUNT_CONDITION: &str = "aws:SourceAccount";
const CURRENT_ACCOUNT_ID: &str = "${current.account_id}";

static QUEUE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_queue_name_regex() -> &'static Regex {
    QUEUE_NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,80}$").expect("Invalid Regex"))
}

/// Build the queue plan for one stage.
pub fn plan_queues(stage: &str, settings: &QueueSettings) -> Result<QueuePlan, NetError> {
    check_range(
        "visibility_timeout_seconds",
        settings.visibility_timeout_seconds,
        &VISIBILITY_TIMEOUT_RANGE,
    )?;
    check_range(
        "message_retention_seconds",
        settings.message_retention_seconds,
        &MESSAGE_RETENTION_RANGE,
    )?;

    let dead_letter = if settings.enable_dlq {
        check_range(
            "max_receive_count",
            settings.max_receive_count,
            &MAX_RECEIVE_COUNT_RANGE,
        )?;
        let name = queue_name(stage, "dlq")?;
        Some(Queue {
            tags: stage_tags(stage, &name),
            name,
            visibility_timeout_seconds: None,
            message_retention_seconds: settings.message_retention_seconds,
            redrive_policy: None,
        })
    } else {
        None
    };

    let redrive_policy = dead_letter.as_ref().map(|dlq| RedrivePolicy {
        dead_letter_target_arn: format!("${{{}.arn}}", dlq.name),
        max_receive_count: settings.max_receive_count,
    });

    let name = queue_name(stage, "main-queue")?;
    let main = Queue {
        tags: stage_tags(stage, &name),
        name,
        visibility_timeout_seconds: Some(settings.visibility_timeout_seconds),
        message_retention_seconds: settings.message_retention_seconds,
        redrive_policy,
    };
    log::info!(
        "plan_queues stage={stage} main={} dlq={}",
        main.name,
        dead_letter.as_ref().map(|q| q.name.as_str()).unwrap_or("none")
    );

    Ok(QueuePlan {
        main,
        dead_letter,
        access_policy: current_account_policy(),
    })
}

/// Any principal, but only when the request comes from the deploying account.
fn current_account_policy() -> QueueAccessPolicy {
    QueueAccessPolicy {
        sid: ACCESS_POLICY_SID.to_string(),
        principal: "*".to_string(),
        actions: ALLOWED_ACTIONS.iter().map(|a| a.to_string()).collect(),
        condition: PolicyCondition {
            test: "StringEquals".to_string(),
            variable: SOURCE_ACCOUNT_CONDITION.to_string(),
            value: CURRENT_ACCOUNT_ID.to_string(),
        },
    }
}

fn queue_name(stage: &str, suffix: &str) -> Result<String, NetError> {
    let name = format!("{stage}-{suffix}");
    if get_queue_name_regex().is_match(&name) {
        Ok(name)
    } else {
        Err(NetError::invalid(format!("'{name}' is not a valid queue name")))
    }
}

fn check_range(field: &str, value: u32, range: &RangeInclusive<u32>) -> Result<(), NetError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(NetError::invalid(format!(
            "{field}={value} outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(enable_dlq: bool) -> QueueSettings {
        QueueSettings {
            enable_dlq,
            visibility_timeout_seconds: 120,
            message_retention_seconds: 1_209_600,
            max_receive_count: 5,
        }
    }

    #[test]
    fn test_plan_with_dlq() {
        let plan = plan_queues("prd", &settings(true)).unwrap();
        assert_eq!(plan.main.name, "prd-main-queue");
        let dlq = plan.dead_letter.as_ref().unwrap();
        assert_eq!(dlq.name, "prd-dlq");
        let redrive = plan.main.redrive_policy.as_ref().unwrap();
        assert_eq!(redrive.max_receive_count, 5);
        assert_eq!(
            serde_json::to_string(redrive).unwrap(),
            r#"{"deadLetterTargetArn":"${prd-dlq.arn}","maxReceiveCount":5}"#
        );
    }

    #[test]
    fn test_access_policy_limited_to_source_account() {
        let plan = plan_queues("dev", &settings(false)).unwrap();
        let policy = &plan.access_policy;
        assert_eq!(policy.sid, "AllowCurrentAccountAccess");
        assert_eq!(policy.actions, ALLOWED_ACTIONS);
        assert_eq!(policy.condition.test, "StringEquals");
        assert_eq!(policy.condition.variable, SOURCE_ACCOUNT_CONDITION);
        assert_eq!(policy.condition.value, "${current.account_id}");
    }

    #[test]
    fn test_plan_without_dlq_has_no_redrive() {
        let plan = plan_queues("dev", &settings(false)).unwrap();
        assert!(plan.dead_letter.is_none());
        assert!(plan.main.redrive_policy.is_none());
        assert_eq!(plan.main.visibility_timeout_seconds, Some(120));
    }

    #[test]
    fn test_max_receive_count_only_checked_with_dlq() {
        let mut s = settings(false);
        s.max_receive_count = 0;
        assert!(plan_queues("dev", &s).is_ok());
        s.enable_dlq = true;
        assert!(plan_queues("dev", &s).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_attributes() {
        let mut s = settings(true);
        s.visibility_timeout_seconds = 43_201;
        assert!(plan_queues("dev", &s).is_err());
        let mut s = settings(true);
        s.message_retention_seconds = 59;
        assert!(plan_queues("dev", &s).is_err());
    }

    #[test]
    fn test_rejects_bad_stage_name() {
        assert!(plan_queues("dev stage", &settings(false)).is_err());
        assert!(plan_queues(&"x".repeat(80), &settings(false)).is_err());
    }
}
