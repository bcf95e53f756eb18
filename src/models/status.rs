use serde::{Deserialize, Serialize};

/// Lifecycle of an application, from submission to a terminal decision.
///
/// An application enters at `Pending`. Admins drive approval, scheduling,
/// rejection and the final selection; interviewers drive the pass/fail
/// outcomes. `Selected` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Interview1Scheduled,
    Interview1Passed,
    Interview1Failed,
    Interview2Scheduled,
    Interview2Passed,
    Interview2Failed,
    Interview3Scheduled,
    Interview3Passed,
    Interview3Failed,
    Selected,
    Rejected,
}

/// One of the three sequential interview slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotNumber {
    First,
    Second,
    Third,
}

impl SlotNumber {
    pub fn from_index(index: i16) -> Option<Self> {
        match index {
            1 => Some(SlotNumber::First),
            2 => Some(SlotNumber::Second),
            3 => Some(SlotNumber::Third),
            _ => None,
        }
    }

    pub fn index(self) -> i16 {
        match self {
            SlotNumber::First => 1,
            SlotNumber::Second => 2,
            SlotNumber::Third => 3,
        }
    }

    /// The slot that must have been passed before this one can be scheduled.
    pub fn prior(self) -> Option<SlotNumber> {
        match self {
            SlotNumber::First => None,
            SlotNumber::Second => Some(SlotNumber::First),
            SlotNumber::Third => Some(SlotNumber::Second),
        }
    }
}

/// Terminal result of a conducted interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotOutcome {
    Passed,
    Failed,
}

/// An action an actor may attempt against an application's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Approve,
    Reject,
    Schedule(SlotNumber),
    RecordOutcome(SlotNumber, SlotOutcome),
    MarkSelected,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cannot {action} an application in status {status:?}")]
pub struct TransitionError {
    pub status: ApplicationStatus,
    pub action: &'static str,
}

impl ApplicationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Selected | ApplicationStatus::Rejected)
    }

    /// The status entered when the given slot is scheduled.
    pub fn scheduled(slot: SlotNumber) -> Self {
        match slot {
            SlotNumber::First => ApplicationStatus::Interview1Scheduled,
            SlotNumber::Second => ApplicationStatus::Interview2Scheduled,
            SlotNumber::Third => ApplicationStatus::Interview3Scheduled,
        }
    }

    /// The status entered when the given slot's outcome is recorded.
    pub fn evaluated(slot: SlotNumber, outcome: SlotOutcome) -> Self {
        match (slot, outcome) {
            (SlotNumber::First, SlotOutcome::Passed) => ApplicationStatus::Interview1Passed,
            (SlotNumber::First, SlotOutcome::Failed) => ApplicationStatus::Interview1Failed,
            (SlotNumber::Second, SlotOutcome::Passed) => ApplicationStatus::Interview2Passed,
            (SlotNumber::Second, SlotOutcome::Failed) => ApplicationStatus::Interview2Failed,
            (SlotNumber::Third, SlotOutcome::Passed) => ApplicationStatus::Interview3Passed,
            (SlotNumber::Third, SlotOutcome::Failed) => ApplicationStatus::Interview3Failed,
        }
    }

    /// The status from which the given slot may be scheduled.
    fn schedulable_from(slot: SlotNumber) -> Self {
        match slot.prior() {
            None => ApplicationStatus::Approved,
            Some(prior) => ApplicationStatus::evaluated(prior, SlotOutcome::Passed),
        }
    }

    /// Validate an action against the current status and return the status it
    /// leads to. Fails without side effects; callers must not write anything
    /// unless this succeeds.
    pub fn apply(self, action: StatusAction) -> Result<ApplicationStatus, TransitionError> {
        match action {
            StatusAction::Approve => match self {
                ApplicationStatus::Pending => Ok(ApplicationStatus::Approved),
                status => Err(TransitionError {
                    status,
                    action: "approve",
                }),
            },
            // A failed interview does not auto-reject; the admin decides
            // separately, so Reject is legal from failed states too.
            StatusAction::Reject => match self {
                ApplicationStatus::Pending
                | ApplicationStatus::Approved
                | ApplicationStatus::Interview1Passed
                | ApplicationStatus::Interview2Passed
                | ApplicationStatus::Interview3Passed
                | ApplicationStatus::Interview1Failed
                | ApplicationStatus::Interview2Failed
                | ApplicationStatus::Interview3Failed => Ok(ApplicationStatus::Rejected),
                status => Err(TransitionError {
                    status,
                    action: "reject",
                }),
            },
            StatusAction::Schedule(slot) => {
                if self == ApplicationStatus::schedulable_from(slot) {
                    Ok(ApplicationStatus::scheduled(slot))
                } else {
                    Err(TransitionError {
                        status: self,
                        action: "schedule an interview for",
                    })
                }
            }
            StatusAction::RecordOutcome(slot, outcome) => {
                if self == ApplicationStatus::scheduled(slot) {
                    Ok(ApplicationStatus::evaluated(slot, outcome))
                } else {
                    Err(TransitionError {
                        status: self,
                        action: "record an interview outcome for",
                    })
                }
            }
            StatusAction::MarkSelected => match self {
                ApplicationStatus::Interview3Passed => Ok(ApplicationStatus::Selected),
                status => Err(TransitionError {
                    status,
                    action: "select",
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;
    use SlotNumber::*;
    use SlotOutcome::*;

    #[test]
    fn full_happy_path_ends_in_selected() {
        let mut status = Pending;
        let actions = [
            StatusAction::Approve,
            StatusAction::Schedule(First),
            StatusAction::RecordOutcome(First, Passed),
            StatusAction::Schedule(Second),
            StatusAction::RecordOutcome(Second, Passed),
            StatusAction::Schedule(Third),
            StatusAction::RecordOutcome(Third, Passed),
            StatusAction::MarkSelected,
        ];
        for action in actions {
            status = status.apply(action).unwrap();
        }
        assert_eq!(status, Selected);
    }

    #[test]
    fn approve_moves_pending_to_approved() {
        assert_eq!(Pending.apply(StatusAction::Approve), Ok(Approved));
    }

    #[test]
    fn approve_fails_from_any_other_state() {
        for status in [Approved, Interview1Scheduled, Selected, Rejected] {
            assert!(status.apply(StatusAction::Approve).is_err());
        }
    }

    #[test]
    fn schedule_first_interview_requires_approval() {
        assert_eq!(
            Approved.apply(StatusAction::Schedule(First)),
            Ok(Interview1Scheduled)
        );
        assert!(Pending.apply(StatusAction::Schedule(First)).is_err());
    }

    #[test]
    fn schedule_second_interview_from_pending_is_rejected() {
        let err = Pending.apply(StatusAction::Schedule(Second)).unwrap_err();
        assert_eq!(err.status, Pending);
    }

    #[test]
    fn schedule_requires_prior_slot_passed() {
        assert!(Interview1Scheduled
            .apply(StatusAction::Schedule(Second))
            .is_err());
        assert!(Interview1Failed
            .apply(StatusAction::Schedule(Second))
            .is_err());
        assert_eq!(
            Interview1Passed.apply(StatusAction::Schedule(Second)),
            Ok(Interview2Scheduled)
        );
        assert_eq!(
            Interview2Passed.apply(StatusAction::Schedule(Third)),
            Ok(Interview3Scheduled)
        );
    }

    #[test]
    fn rescheduling_a_scheduled_slot_is_a_conflict() {
        assert!(Interview1Scheduled
            .apply(StatusAction::Schedule(First))
            .is_err());
    }

    #[test]
    fn outcome_only_from_matching_scheduled_state() {
        assert_eq!(
            Interview1Scheduled.apply(StatusAction::RecordOutcome(First, Passed)),
            Ok(Interview1Passed)
        );
        assert_eq!(
            Interview2Scheduled.apply(StatusAction::RecordOutcome(Second, Failed)),
            Ok(Interview2Failed)
        );
        assert!(Interview1Scheduled
            .apply(StatusAction::RecordOutcome(Second, Passed))
            .is_err());
    }

    #[test]
    fn resubmitting_an_outcome_is_rejected() {
        assert!(Interview1Passed
            .apply(StatusAction::RecordOutcome(First, Failed))
            .is_err());
        assert!(Interview3Failed
            .apply(StatusAction::RecordOutcome(Third, Passed))
            .is_err());
    }

    #[test]
    fn failed_interview_is_not_terminal_and_can_be_rejected() {
        assert!(!Interview2Failed.is_terminal());
        assert_eq!(Interview2Failed.apply(StatusAction::Reject), Ok(Rejected));
    }

    #[test]
    fn reject_allowed_from_pending_approved_and_passed_states() {
        for status in [
            Pending,
            Approved,
            Interview1Passed,
            Interview2Passed,
            Interview3Passed,
        ] {
            assert_eq!(status.apply(StatusAction::Reject), Ok(Rejected));
        }
    }

    #[test]
    fn terminal_states_admit_no_further_transitions() {
        for status in [Selected, Rejected] {
            assert!(status.is_terminal());
            assert!(status.apply(StatusAction::Approve).is_err());
            assert!(status.apply(StatusAction::Reject).is_err());
            assert!(status.apply(StatusAction::Schedule(First)).is_err());
            assert!(status
                .apply(StatusAction::RecordOutcome(First, Passed))
                .is_err());
            assert!(status.apply(StatusAction::MarkSelected).is_err());
        }
    }

    #[test]
    fn selection_is_a_manual_step_after_interview_three() {
        // Passing interview 3 leaves the record non-terminal until the admin
        // explicitly marks it selected.
        let status = Interview3Scheduled
            .apply(StatusAction::RecordOutcome(Third, Passed))
            .unwrap();
        assert_eq!(status, Interview3Passed);
        assert!(!status.is_terminal());
        assert_eq!(status.apply(StatusAction::MarkSelected), Ok(Selected));
    }

    #[test]
    fn mark_selected_fails_before_final_interview_passes() {
        for status in [Pending, Approved, Interview2Passed, Interview3Scheduled] {
            assert!(status.apply(StatusAction::MarkSelected).is_err());
        }
    }

    #[test]
    fn slot_numbers_round_trip_and_order() {
        assert_eq!(SlotNumber::from_index(2), Some(Second));
        assert_eq!(SlotNumber::from_index(4), None);
        assert_eq!(Third.prior(), Some(Second));
        assert_eq!(First.prior(), None);
        assert_eq!(First.index(), 1);
    }

    #[test]
    fn status_serializes_in_snake_case() {
        let json = serde_json::to_string(&Interview2Scheduled).unwrap();
        assert_eq!(json, "\"interview2_scheduled\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"interview3_passed\"").unwrap();
        assert_eq!(parsed, Interview3Passed);
    }
}
