//! Plain-text email templates for every notification event.

use chrono::{DateTime, Utc};

use crate::models::status::{SlotNumber, SlotOutcome};
use crate::services::notification::{NotificationEvent, PendingSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

const SIGNATURE: &str = "Regards,\nTraining Institute Team";

fn format_schedule(date: &DateTime<Utc>) -> String {
    date.format("%A, %B %e, %Y at %H:%M UTC").to_string()
}

/// Render the email(s) a notification event produces. Scheduling and
/// reminders address both the student and the interviewer; everything else
/// addresses a single recipient.
pub fn render(event: &NotificationEvent) -> Vec<OutboundEmail> {
    match event {
        NotificationEvent::ApplicationSubmitted {
            application_id,
            email,
            name,
        } => vec![OutboundEmail {
            to: email.clone(),
            subject: "Application Received - Training Institute".to_string(),
            body: format!(
                "Dear {name},\n\n\
                 Thank you for applying to our training program. We have received \
                 your application and it is currently under review.\n\
                 You will be notified once your application is processed and an \
                 interview is scheduled.\n\n\
                 Application ID: {application_id}\n\n\
                 If you have any questions, please contact our support team.\n\n\
                 {SIGNATURE}"
            ),
        }],
        NotificationEvent::ApplicationRejected {
            email,
            name,
            reason,
        } => vec![OutboundEmail {
            to: email.clone(),
            subject: "Application Update - Training Institute".to_string(),
            body: format!(
                "Dear {name},\n\n\
                 We regret to inform you that your application to our training \
                 program has not been successful.\n\n\
                 Reason: {reason}\n\n\
                 We appreciate your interest and wish you the best in your future \
                 endeavors.\n\n\
                 {SIGNATURE}"
            ),
        }],
        NotificationEvent::InterviewScheduled {
            slot,
            student_email,
            student_name,
            interviewer_email,
            interviewer_name,
            meeting_link,
            scheduled_date,
        } => {
            let number = slot.index();
            let when = format_schedule(scheduled_date);
            vec![
                OutboundEmail {
                    to: student_email.clone(),
                    subject: format!("Interview {number} Scheduled - Training Institute"),
                    body: format!(
                        "Dear {student_name},\n\n\
                         Your interview for the training program has been scheduled \
                         with {interviewer_name} on {when}.\n\n\
                         Please join the interview using the following link:\n\
                         {meeting_link}\n\n\
                         Please be on time and make sure your camera and microphone \
                         are working properly.\n\n\
                         {SIGNATURE}"
                    ),
                },
                OutboundEmail {
                    to: interviewer_email.clone(),
                    subject: format!("Interview {number} Assignment - Training Institute"),
                    body: format!(
                        "Dear {interviewer_name},\n\n\
                         You have been assigned to conduct an interview for a training \
                         program applicant.\n\n\
                         Applicant: {student_name}\n\
                         Email: {student_email}\n\
                         Interview Date: {when}\n\
                         Meeting Link: {meeting_link}\n\n\
                         Please log in to the interviewer dashboard to view more details \
                         and to provide your evaluation after the interview.\n\n\
                         {SIGNATURE}"
                    ),
                },
            ]
        }
        NotificationEvent::InterviewResult {
            slot,
            outcome,
            student_email,
            student_name,
            feedback,
        } => {
            let number = slot.index();
            let verdict = match outcome {
                SlotOutcome::Passed => "Passed",
                SlotOutcome::Failed => "Not Selected",
            };
            let detail = match (outcome, slot) {
                (SlotOutcome::Passed, SlotNumber::Third) => {
                    "Congratulations! You have passed all interviews. The admissions \
                     team will review your file for final selection."
                        .to_string()
                }
                (SlotOutcome::Passed, _) => format!(
                    "Congratulations! You have passed Interview {number}. You will \
                     soon be contacted for the next round of interviews."
                ),
                (SlotOutcome::Failed, _) => {
                    "We regret to inform you that you have not been selected to move \
                     forward in the process. We appreciate your interest and wish you \
                     the best in your future endeavors."
                        .to_string()
                }
            };
            vec![OutboundEmail {
                to: student_email.clone(),
                subject: format!("Interview {number} Result - Training Institute"),
                body: format!(
                    "Dear {student_name},\n\n\
                     We would like to inform you about the result of your recent \
                     interview for the training program.\n\n\
                     Result: {verdict}\n\n\
                     {detail}\n\n\
                     Feedback: {feedback}\n\n\
                     {SIGNATURE}"
                ),
            }]
        }
        NotificationEvent::ApplicationSelected {
            student_email,
            student_name,
        } => vec![OutboundEmail {
            to: student_email.clone(),
            subject: "Congratulations! You have been selected - Training Institute".to_string(),
            body: format!(
                "Dear {student_name},\n\n\
                 We are pleased to inform you that you have been selected for our \
                 training program. Congratulations!\n\n\
                 Our team will contact you soon with details about the next steps, \
                 including start date, schedule, and other important information.\n\n\
                 We look forward to welcoming you to our training program and helping \
                 you develop your skills.\n\n\
                 {SIGNATURE}"
            ),
        }],
        NotificationEvent::DailySummary {
            admin_email,
            summary,
        } => vec![OutboundEmail {
            to: admin_email.clone(),
            subject: "Daily Applications Status Report - Training Institute".to_string(),
            body: render_summary(summary),
        }],
        NotificationEvent::InterviewReminder {
            slot,
            student_email,
            student_name,
            interviewer_email,
            interviewer_name,
            meeting_link,
            scheduled_date,
        } => {
            let number = slot.index();
            let when = format_schedule(scheduled_date);
            vec![
                OutboundEmail {
                    to: interviewer_email.clone(),
                    subject: "Reminder: Interview in 1 hour - Training Institute".to_string(),
                    body: format!(
                        "Dear {interviewer_name},\n\n\
                         This is a reminder that you have an interview scheduled in 1 hour.\n\n\
                         Applicant: {student_name}\n\
                         Interview: Interview {number}\n\
                         Date & Time: {when}\n\
                         Meeting Link: {meeting_link}\n\n\
                         Please ensure you're prepared and ready for the interview.\n\n\
                         {SIGNATURE}"
                    ),
                },
                OutboundEmail {
                    to: student_email.clone(),
                    subject: "Reminder: Your interview is in 1 hour - Training Institute"
                        .to_string(),
                    body: format!(
                        "Dear {student_name},\n\n\
                         This is a reminder that your interview is scheduled in 1 hour.\n\n\
                         Interview: Interview {number}\n\
                         Date & Time: {when}\n\
                         Interviewer: {interviewer_name}\n\
                         Meeting Link: {meeting_link}\n\n\
                         Please ensure you're prepared and ready for the interview. Make \
                         sure your camera and microphone are working properly.\n\n\
                         {SIGNATURE}"
                    ),
                },
            ]
        }
    }
}

fn render_summary(summary: &PendingSummary) -> String {
    format!(
        "Here is the current status of applications:\n\n\
         - New Applications (Pending): {}\n\
         - Interview 1 Scheduled: {}\n\
         - Interview 1 Passed (Awaiting Interview 2): {}\n\
         - Interview 2 Scheduled: {}\n\
         - Interview 2 Passed (Awaiting Interview 3): {}\n\
         - Interview 3 Scheduled: {}\n\n\
         Please log in to the admin dashboard to take necessary actions.\n\n\
         {SIGNATURE}",
        summary.pending,
        summary.interview1_scheduled,
        summary.interview1_passed,
        summary.interview2_scheduled,
        summary.interview2_passed,
        summary.interview3_scheduled,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scheduled_event() -> NotificationEvent {
        NotificationEvent::InterviewScheduled {
            slot: SlotNumber::Second,
            student_email: "student@example.com".to_string(),
            student_name: "Asha".to_string(),
            interviewer_email: "alice@x.com".to_string(),
            interviewer_name: "Alice".to_string(),
            meeting_link: "https://meet/2".to_string(),
            scheduled_date: Utc.with_ymd_and_hms(2026, 9, 3, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn scheduling_notifies_student_and_interviewer() {
        let emails = render(&scheduled_event());
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].to, "student@example.com");
        assert_eq!(emails[0].subject, "Interview 2 Scheduled - Training Institute");
        assert!(emails[0].body.contains("https://meet/2"));
        assert!(emails[0].body.contains("Alice"));
        assert_eq!(emails[1].to, "alice@x.com");
        assert!(emails[1].body.contains("Asha"));
    }

    #[test]
    fn rejection_email_carries_the_reason() {
        let emails = render(&NotificationEvent::ApplicationRejected {
            email: "student@example.com".to_string(),
            name: "Asha".to_string(),
            reason: "Incomplete resume".to_string(),
        });
        assert_eq!(emails.len(), 1);
        assert!(emails[0].body.contains("Reason: Incomplete resume"));
    }

    #[test]
    fn passing_an_early_interview_mentions_the_next_round() {
        let emails = render(&NotificationEvent::InterviewResult {
            slot: SlotNumber::First,
            outcome: SlotOutcome::Passed,
            student_email: "student@example.com".to_string(),
            student_name: "Asha".to_string(),
            feedback: "Good fundamentals".to_string(),
        });
        assert!(emails[0].body.contains("next round"));
        assert!(emails[0].body.contains("Feedback: Good fundamentals"));
    }

    #[test]
    fn passing_the_final_interview_defers_to_the_selection_review() {
        let emails = render(&NotificationEvent::InterviewResult {
            slot: SlotNumber::Third,
            outcome: SlotOutcome::Passed,
            student_email: "student@example.com".to_string(),
            student_name: "Asha".to_string(),
            feedback: "Strong all around".to_string(),
        });
        assert!(emails[0].body.contains("passed all interviews"));
        assert!(!emails[0].body.contains("have been selected"));
    }

    #[test]
    fn failed_result_reads_as_not_selected() {
        let emails = render(&NotificationEvent::InterviewResult {
            slot: SlotNumber::Second,
            outcome: SlotOutcome::Failed,
            student_email: "student@example.com".to_string(),
            student_name: "Asha".to_string(),
            feedback: "Needs deeper SQL knowledge".to_string(),
        });
        assert!(emails[0].body.contains("Result: Not Selected"));
    }

    #[test]
    fn daily_summary_lists_every_bucket() {
        let emails = render(&NotificationEvent::DailySummary {
            admin_email: "admin@example.com".to_string(),
            summary: PendingSummary {
                pending: 4,
                interview1_scheduled: 2,
                interview1_passed: 1,
                interview2_scheduled: 0,
                interview2_passed: 3,
                interview3_scheduled: 1,
            },
        });
        let body = &emails[0].body;
        assert!(body.contains("New Applications (Pending): 4"));
        assert!(body.contains("Interview 2 Passed (Awaiting Interview 3): 3"));
        assert!(body.contains("Interview 3 Scheduled: 1"));
    }

    #[test]
    fn reminder_goes_to_both_parties() {
        let emails = render(&NotificationEvent::InterviewReminder {
            slot: SlotNumber::First,
            student_email: "student@example.com".to_string(),
            student_name: "Asha".to_string(),
            interviewer_email: "alice@x.com".to_string(),
            interviewer_name: "Alice".to_string(),
            meeting_link: "https://meet/1".to_string(),
            scheduled_date: Utc.with_ymd_and_hms(2026, 9, 3, 11, 0, 0).unwrap(),
        });
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].to, "alice@x.com");
        assert_eq!(emails[1].to, "student@example.com");
    }
}
