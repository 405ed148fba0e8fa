//! The single authority over order status changes.
//!
//! Customer-initiated moves go through [`plan_transition`]; fulfillment moves
//! (into `SHIPPED` / `DELIVERED`) go through [`FulfillmentRules`].

use std::str::FromStr;

use super::errors::DomainError;
use super::order::{OrderStatus, TargetStatus};

/// How the `CONFIRMED` target is guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPolicy {
    /// Only a `DELIVERED` order can be confirmed.
    #[default]
    Strict,
    /// Any non-terminal order can be confirmed.
    Lenient,
}

impl FromStr for ConfirmPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ConfirmPolicy::Strict),
            "lenient" => Ok(ConfirmPolicy::Lenient),
            other => Err(format!("expected 'strict' or 'lenient', got '{other}'")),
        }
    }
}

/// What applying a permitted transition must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub next: OrderStatus,
    /// Release every item's frozen quantity back to the ledger.
    pub restock: bool,
    pub default_message: &'static str,
}

pub fn plan_transition(
    current: OrderStatus,
    target: TargetStatus,
    policy: ConfirmPolicy,
) -> Result<TransitionPlan, DomainError> {
    use OrderStatus::*;

    let allowed = match target {
        TargetStatus::Canceled => current == Pending,
        TargetStatus::Returned => current == Delivered,
        TargetStatus::Confirmed => match policy {
            ConfirmPolicy::Strict => current == Delivered,
            ConfirmPolicy::Lenient => matches!(current, Pending | Shipped | Delivered),
        },
    };
    if !allowed {
        return Err(DomainError::InvalidTransition {
            from: current,
            to: target.into(),
        });
    }

    Ok(match target {
        TargetStatus::Canceled => TransitionPlan {
            next: Canceled,
            restock: true,
            default_message: "Customer canceled the order",
        },
        TargetStatus::Returned => TransitionPlan {
            next: Returned,
            restock: true,
            default_message: "Customer returned the order",
        },
        TargetStatus::Confirmed => TransitionPlan {
            next: Confirmed,
            restock: false,
            default_message: "Customer confirmed receipt",
        },
    })
}

/// Extension point for an external fulfillment process.
///
/// No transitions into or out of `SHIPPED` are defined for customers; whoever
/// integrates shipping supplies the rules here.
pub trait FulfillmentRules: Send + Sync + 'static {
    fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool;
}

/// Rejects every fulfillment move.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFulfillment;

impl FulfillmentRules for NoFulfillment {
    fn allows(&self, _from: OrderStatus, _to: OrderStatus) -> bool {
        false
    }
}

pub fn plan_fulfillment(
    rules: &dyn FulfillmentRules,
    current: OrderStatus,
    next: OrderStatus,
) -> Result<TransitionPlan, DomainError> {
    let customer_owned = matches!(
        next,
        OrderStatus::Canceled | OrderStatus::Returned | OrderStatus::Confirmed
    );
    if customer_owned || !rules.allows(current, next) {
        return Err(DomainError::InvalidTransition { from: current, to: next });
    }
    Ok(TransitionPlan {
        next,
        restock: false,
        default_message: match next {
            OrderStatus::Shipped => "Order shipped",
            OrderStatus::Delivered => "Order delivered",
            _ => "Fulfillment status updated",
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus::*;

    const ALL: [OrderStatus; 6] = [Pending, Confirmed, Shipped, Delivered, Canceled, Returned];

    #[test]
    fn cancel_only_from_pending_and_restocks() {
        let plan = plan_transition(Pending, TargetStatus::Canceled, ConfirmPolicy::Strict)
            .expect("pending is cancelable");
        assert_eq!(plan.next, Canceled);
        assert!(plan.restock);

        for from in ALL.into_iter().filter(|s| *s != Pending) {
            assert!(
                matches!(
                    plan_transition(from, TargetStatus::Canceled, ConfirmPolicy::Strict),
                    Err(DomainError::InvalidTransition { .. })
                ),
                "{from} should not be cancelable"
            );
        }
    }

    #[test]
    fn return_only_from_delivered_and_restocks() {
        let plan = plan_transition(Delivered, TargetStatus::Returned, ConfirmPolicy::Strict)
            .expect("delivered is returnable");
        assert_eq!(plan.next, Returned);
        assert!(plan.restock);

        for from in ALL.into_iter().filter(|s| *s != Delivered) {
            assert!(plan_transition(from, TargetStatus::Returned, ConfirmPolicy::Lenient).is_err());
        }
    }

    #[test]
    fn strict_confirm_requires_delivered_and_never_restocks() {
        let plan = plan_transition(Delivered, TargetStatus::Confirmed, ConfirmPolicy::Strict)
            .expect("delivered is confirmable");
        assert_eq!(plan.next, Confirmed);
        assert!(!plan.restock);

        assert!(plan_transition(Pending, TargetStatus::Confirmed, ConfirmPolicy::Strict).is_err());
        assert!(plan_transition(Shipped, TargetStatus::Confirmed, ConfirmPolicy::Strict).is_err());
    }

    #[test]
    fn lenient_confirm_accepts_any_non_terminal_status() {
        for from in [Pending, Shipped, Delivered] {
            assert!(plan_transition(from, TargetStatus::Confirmed, ConfirmPolicy::Lenient).is_ok());
        }
        for from in [Confirmed, Canceled, Returned] {
            assert!(plan_transition(from, TargetStatus::Confirmed, ConfirmPolicy::Lenient).is_err());
        }
    }

    #[test]
    fn terminal_statuses_accept_nothing() {
        for from in [Canceled, Returned, Confirmed] {
            for target in [
                TargetStatus::Canceled,
                TargetStatus::Returned,
                TargetStatus::Confirmed,
            ] {
                assert!(plan_transition(from, target, ConfirmPolicy::Lenient).is_err());
            }
        }
    }

    #[test]
    fn confirm_policy_parses_case_insensitively() {
        assert_eq!("STRICT".parse::<ConfirmPolicy>(), Ok(ConfirmPolicy::Strict));
        assert_eq!(" lenient ".parse::<ConfirmPolicy>(), Ok(ConfirmPolicy::Lenient));
        assert!("loose".parse::<ConfirmPolicy>().is_err());
    }

    struct ShipThenDeliver;

    impl FulfillmentRules for ShipThenDeliver {
        fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
            matches!((from, to), (Pending, Shipped) | (Shipped, Delivered))
        }
    }

    #[test]
    fn no_fulfillment_rejects_shipping() {
        assert!(plan_fulfillment(&NoFulfillment, Pending, Shipped).is_err());
    }

    #[test]
    fn custom_fulfillment_rules_drive_shipping() {
        let plan = plan_fulfillment(&ShipThenDeliver, Pending, Shipped).expect("allowed");
        assert_eq!(plan.next, Shipped);
        assert!(!plan.restock);
        assert!(plan_fulfillment(&ShipThenDeliver, Shipped, Delivered).is_ok());
        assert!(plan_fulfillment(&ShipThenDeliver, Pending, Delivered).is_err());
    }

    #[test]
    fn fulfillment_cannot_reach_customer_statuses() {
        struct AllowAll;
        impl FulfillmentRules for AllowAll {
            fn allows(&self, _: OrderStatus, _: OrderStatus) -> bool {
                true
            }
        }
        assert!(plan_fulfillment(&AllowAll, Pending, Canceled).is_err());
        assert!(plan_fulfillment(&AllowAll, Delivered, Returned).is_err());
    }
}
