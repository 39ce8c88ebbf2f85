use crate::Result;
use crate::dom::{Dom, NodeId};

pub(crate) const QUICK_BOOKING_LOADING_HTML: &str =
    "<span>Processing...</span> <i class=\"fas fa-spinner fa-spin\"></i>";
pub(crate) const QUICK_BOOKING_SUCCESS: &str =
    "Booking successful! Check your email for confirmation.";

/// The confirm text for a book button on an event card, or `None` when the
/// button is not on a card.
pub(crate) fn booking_prompt(dom: &Dom, button: NodeId) -> Result<Option<String>> {
    let Some(card) = dom.closest(button, ".event-card")? else {
        return Ok(None);
    };
    let title = dom
        .query_selector_from(card, ".event-info h3")?
        .map(|heading| dom.text_content(heading))
        .unwrap_or_default();
    let date = dom
        .query_selector_from(card, ".event-date")?
        .map(|date| dom.text_content(date))
        .unwrap_or_default();
    Ok(Some(format!("Confirm booking for:\n{title}\n{date}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;

    #[test]
    fn prompt_names_event_and_date() -> Result<()> {
        let dom = parse_html(
            r#"<div class="event-card">
                 <div class="event-info"><h3>Amr Diab Live</h3><span class="event-date">April 2, 2025</span></div>
                 <button class="book-btn" id="b">Book</button>
               </div>
               <button class="book-btn" id="loose">Book</button>"#,
        )?;
        let button = dom.by_id("b").expect("button");
        assert_eq!(
            booking_prompt(&dom, button)?.as_deref(),
            Some("Confirm booking for:\nAmr Diab Live\nApril 2, 2025")
        );
        let loose = dom.by_id("loose").expect("loose");
        assert_eq!(booking_prompt(&dom, loose)?, None);
        Ok(())
    }
}
