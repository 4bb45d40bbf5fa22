//! Match notification message rendering.
//!
//! Two messages per confirmed match: one telling the lost-item reporter
//! their item may have been found, one telling the finder someone may
//! claim it. Each carries the counterpart's details, the other party's
//! contact info, and the rounded percentage score.

use chrono::{DateTime, Utc};

use foundry_core::Item;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Round a similarity score to a whole percentage.
pub fn score_percent(score: f32) -> u32 {
    (score * 100.0).round() as u32
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => "unknown date".to_string(),
    }
}

fn image_block(image_url: Option<&str>, alt: &str) -> String {
    match image_url {
        Some(url) => format!(
            r#"<img src="{url}" alt="{alt}" style="max-width: 100%; height: auto; border-radius: 4px;">"#
        ),
        None => String::new(),
    }
}

/// Render the message sent to the lost item's reporter.
pub fn lost_party_notification(lost: &Item, found: &Item, score: f32) -> MailMessage {
    let subject = format!(
        "Good News! We found a match for your lost {}",
        lost.item_type
    );

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #4CAF50;">Great News! We Found a Match!</h2>

  <p>Dear User,</p>

  <p>We have found a potential match for your lost <strong>{item_type}</strong> that you reported on {date_lost}.</p>

  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3>Match Details:</h3>
    <p><strong>Match Confidence:</strong> {percent}%</p>
    <p><strong>Found Item Description:</strong> {found_description}</p>
    <p><strong>Location Found:</strong> {found_location}</p>
    <p><strong>Date Found:</strong> {date_found}</p>
    {image}
  </div>

  <div style="background-color: #e3f2fd; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <h4>Next Steps:</h4>
    <p>Please contact the person who found this item to verify if it belongs to you.</p>
    <p><strong>Contact Information:</strong> {found_contact}</p>
  </div>

  <p style="color: #666; font-size: 14px;">
    Note: Please verify the item carefully before making any claims. The platform is not responsible for the accuracy of the matches.
  </p>

  <hr style="border: 1px solid #eee; margin: 30px 0;">
  <p style="color: #666; font-size: 12px;">
    This is an automated message from Foundry Lost &amp; Found System.<br>
    If you didn't report a lost item, please ignore this email.
  </p>
</div>"#,
        item_type = lost.item_type,
        date_lost = format_date(lost.date_lost),
        percent = score_percent(score),
        found_description = found.description,
        found_location = found.location,
        date_found = format_date(found.date_found),
        image = image_block(found.image_url.as_deref(), "Found item"),
        found_contact = found.contact_info,
    );

    MailMessage {
        to: lost.contact_info.clone(),
        subject,
        html,
    }
}

/// Render the message sent to the finder.
pub fn found_party_notification(lost: &Item, found: &Item, score: f32) -> MailMessage {
    let subject = format!(
        "Potential Match Found for the {} You Found",
        found.item_type
    );

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2196F3;">Potential Match Found!</h2>

  <p>Dear User,</p>

  <p>We have found a potential match for the <strong>{item_type}</strong> you found on {date_found}.</p>

  <div style="background-color: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3>Match Details:</h3>
    <p><strong>Match Confidence:</strong> {percent}%</p>
    <p><strong>Lost Item Description:</strong> {lost_description}</p>
    <p><strong>Location Lost:</strong> {lost_location}</p>
    <p><strong>Date Lost:</strong> {date_lost}</p>
    {image}
  </div>

  <div style="background-color: #fff3e0; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <h4>Next Steps:</h4>
    <p>Someone who lost this item may contact you soon. Please be prepared to:</p>
    <ul>
      <li>Verify the description matches the item you found</li>
      <li>Ask for specific details to confirm ownership</li>
      <li>Arrange a safe meeting place for item return</li>
    </ul>
    <p><strong>Contact Information of Lost Item Owner:</strong> {lost_contact}</p>
  </div>

  <p style="color: #666; font-size: 14px;">
    Please exercise caution when sharing personal information and meeting strangers. Choose public places for item exchanges.
  </p>

  <hr style="border: 1px solid #eee; margin: 30px 0;">
  <p style="color: #666; font-size: 12px;">
    This is an automated message from Foundry Lost &amp; Found System.<br>
    If you didn't report a found item, please ignore this email.
  </p>
</div>"#,
        item_type = found.item_type,
        date_found = format_date(found.date_found),
        percent = score_percent(score),
        lost_description = lost.description,
        lost_location = lost.location,
        date_lost = format_date(lost.date_lost),
        image = image_block(lost.image_url.as_deref(), "Lost item"),
        lost_contact = lost.contact_info,
    );

    MailMessage {
        to: found.contact_info.clone(),
        subject,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use foundry_core::{EnrichmentStatus, ItemStatus, ReportKind};
    use uuid::Uuid;

    fn item(kind: ReportKind, item_type: &str, contact: &str) -> Item {
        let date = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
        Item {
            id: Uuid::new_v4(),
            external_id: None,
            item_type: item_type.to_string(),
            category: None,
            description: format!("description of {item_type}"),
            location: "Library".to_string(),
            date_lost: (kind == ReportKind::Lost).then_some(date),
            date_found: (kind == ReportKind::Found).then_some(date),
            contact_info: contact.to_string(),
            contact_number: None,
            reporter_name: None,
            image_url: None,
            report_kind: kind,
            status: ItemStatus::Active,
            enrichment: EnrichmentStatus::Complete,
            matches: vec![],
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_score_percent_rounds() {
        assert_eq!(score_percent(0.954), 95);
        assert_eq!(score_percent(0.956), 96);
        assert_eq!(score_percent(0.7), 70);
        assert_eq!(score_percent(1.0), 100);
    }

    #[test]
    fn test_lost_party_message_addresses_lost_contact() {
        let lost = item(ReportKind::Lost, "wallet", "owner@example.edu");
        let found = item(ReportKind::Found, "wallet", "finder@example.edu");
        let msg = lost_party_notification(&lost, &found, 0.87);

        assert_eq!(msg.to, "owner@example.edu");
        assert!(msg.subject.contains("your lost wallet"));
        assert!(msg.html.contains("87%"));
        assert!(msg.html.contains("finder@example.edu"));
        assert!(msg.html.contains("Location Found:"));
    }

    #[test]
    fn test_found_party_message_addresses_finder() {
        let lost = item(ReportKind::Lost, "wallet", "owner@example.edu");
        let found = item(ReportKind::Found, "wallet", "finder@example.edu");
        let msg = found_party_notification(&lost, &found, 0.87);

        assert_eq!(msg.to, "finder@example.edu");
        assert!(msg.subject.contains("You Found"));
        assert!(msg.html.contains("owner@example.edu"));
        assert!(msg.html.contains("Date Lost:"));
        assert!(msg.html.contains("January 3, 2026"));
    }

    #[test]
    fn test_image_block_omitted_without_url() {
        let lost = item(ReportKind::Lost, "wallet", "owner@example.edu");
        let found = item(ReportKind::Found, "wallet", "finder@example.edu");
        let msg = lost_party_notification(&lost, &found, 0.87);
        assert!(!msg.html.contains("<img"));
    }

    #[test]
    fn test_image_block_present_with_url() {
        let lost = item(ReportKind::Lost, "wallet", "owner@example.edu");
        let mut found = item(ReportKind::Found, "wallet", "finder@example.edu");
        found.image_url = Some("http://images.local/found-items-abc.webp".to_string());
        let msg = lost_party_notification(&lost, &found, 0.87);
        assert!(msg.html.contains("found-items-abc.webp"));
    }
}
