use portal_enhancer::{Notification, Page, Severity};

const ENROLL_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Enroll</title></head>
<body>
  <h1>Course Registration</h1>
  <form id="enroll" action="/student/enroll" method="post">
    <input id="student" name="studentId" required>
    <select id="course" name="courseId" required>
      <option value="">-- choose --</option>
      <option value="cs101">CS101</option>
    </select>
    <input id="note" name="note">
    <button id="submit" type="submit" class="btn btn-primary">Enroll</button>
  </form>
</body>
</html>
"#;

fn booted(html: &str) -> portal_enhancer::Result<Page> {
    let mut page = Page::from_html(html)?;
    page.boot()?;
    Ok(page)
}

#[test]
fn empty_required_fields_cancel_submission_with_one_notification() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.click("#submit")?;

    assert!(page.take_form_submissions().is_empty());
    assert_eq!(
        page.take_notifications(),
        vec![Notification {
            message: "Please fill in all required fields".into(),
            severity: Severity::Error,
        }]
    );
    page.assert_count(".alert.alert-error", 1)?;
    page.assert_text(".alert-error", "Please fill in all required fields")?;

    for field in ["#student", "#course"] {
        page.assert_style(field, "border-color", "var(--ferrari-red)")?;
        page.assert_style(field, "animation", "shake 0.5s")?;
    }
    page.assert_style("#note", "border-color", "")?;
    assert!(!page.is_disabled("#submit")?);
    page.assert_text("#submit", "Enroll")?;
    Ok(())
}

#[test]
fn shake_is_cleared_after_half_a_second() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.click("#submit")?;

    page.advance_time(499)?;
    page.assert_style("#student", "animation", "shake 0.5s")?;
    page.advance_time(1)?;
    page.assert_style("#student", "animation", "")?;
    page.assert_style("#student", "border-color", "var(--ferrari-red)")?;
    Ok(())
}

#[test]
fn filled_fields_are_reset_to_neutral_border() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.type_text("#student", "s-1001")?;
    page.click("#submit")?;

    page.assert_style("#student", "border-color", "#ddd")?;
    page.assert_style("#course", "border-color", "var(--ferrari-red)")?;
    assert_eq!(page.take_notifications().len(), 1);
    Ok(())
}

#[test]
fn whitespace_only_value_counts_as_empty() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.type_text("#student", "   ")?;
    page.select_option("#course", "cs101")?;
    page.submit("#enroll")?;

    assert!(page.take_form_submissions().is_empty());
    page.assert_style("#student", "border-color", "var(--ferrari-red)")?;
    page.assert_style("#course", "border-color", "#ddd")?;
    Ok(())
}

#[test]
fn complete_form_submits_and_locks_the_button() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.type_text("#student", "s-1001")?;
    page.select_option("#course", "cs101")?;
    page.click("#submit")?;

    let submissions = page.take_form_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].action, "/student/enroll");
    assert_eq!(submissions[0].method, "post");
    assert_eq!(
        submissions[0].entries,
        vec![
            ("studentId".to_string(), "s-1001".to_string()),
            ("courseId".to_string(), "cs101".to_string()),
            ("note".to_string(), String::new()),
        ]
    );
    assert!(page.take_notifications().is_empty());

    assert!(page.is_disabled("#submit")?);
    page.assert_exists("#submit > span.loading")?;
    page.assert_text("#submit", " Processing...")?;
    assert_eq!(
        page.inner_html("#submit")?,
        r#"<span class="loading"></span> Processing..."#
    );
    Ok(())
}

#[test]
fn loading_state_is_never_reverted() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.type_text("#student", "s-1001")?;
    page.select_option("#course", "cs101")?;
    page.click("#submit")?;
    page.flush()?;

    assert!(page.is_disabled("#submit")?);
    page.click("#submit")?;
    assert_eq!(page.take_form_submissions().len(), 1);
    Ok(())
}

#[test]
fn checked_agreement_box_without_value_passes() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <form id="terms" action="/student/enroll" method="post">
          <input id="course" name="courseId" required value="42">
          <input id="agree" type="checkbox" name="agree" required checked>
          <button id="enroll" type="submit" class="btn">Enroll</button>
        </form>
        "#,
    )?;
    page.assert_value("#agree", "on")?;
    page.click("#enroll")?;

    assert!(page.take_notifications().is_empty());
    page.assert_style("#agree", "border-color", "#ddd")?;
    let submissions = page.take_form_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].entries,
        vec![
            ("courseId".to_string(), "42".to_string()),
            ("agree".to_string(), "on".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn opt_out_marker_keeps_button_untouched() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <form id="search" action="/courses" method="get" data-no-loading>
          <input id="q" name="q" required>
          <button id="go" type="submit" class="btn">Search</button>
        </form>
        "#,
    )?;
    page.type_text("#q", "calculus")?;
    page.click("#go")?;

    assert_eq!(page.take_form_submissions().len(), 1);
    assert!(!page.is_disabled("#go")?);
    page.assert_text("#go", "Search")?;
    page.assert_style("#q", "border-color", "#ddd")?;
    Ok(())
}

#[test]
fn only_explicit_submit_buttons_get_loading_state() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <form id="f" action="/profile" method="post">
          <input name="email" value="a@b.c" required>
          <button id="save">Save</button>
        </form>
        "#,
    )?;
    page.click("#save")?;

    assert_eq!(page.take_form_submissions().len(), 1);
    assert!(!page.is_disabled("#save")?);
    page.assert_text("#save", "Save")?;
    Ok(())
}

#[test]
fn notification_slides_out_and_is_removed() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.click("#submit")?;
    page.assert_style(".alert-error", "position", "fixed")?;
    page.assert_style(".alert-error", "animation", "slideIn 0.5s ease")?;
    page.assert_exists("body > .alert-error:last-child")?;

    page.advance_time(3000)?;
    page.assert_style(".alert-error", "transition", "all 0.3s ease")?;
    page.assert_style(".alert-error", "opacity", "0")?;
    page.assert_style(".alert-error", "transform", "translateX(100%)")?;
    assert!(page.dump_dom(".alert-error")?.contains("alert alert-error"));

    page.advance_time(299)?;
    page.assert_exists(".alert-error")?;
    page.advance_time(1)?;
    page.assert_absent(".alert-error")?;
    assert!(page.pending_timers().iter().all(|t| t.action != "fade-out"));
    Ok(())
}

#[test]
fn boot_adds_racing_stripe_once() -> portal_enhancer::Result<()> {
    let mut page = booted(ENROLL_PAGE)?;
    page.boot()?;
    page.assert_count(".racing-stripe", 1)?;
    page.assert_exists("body > div.racing-stripe:first-child")?;
    page.assert_count("style#portal-enhancer-styles", 1)?;
    page.assert_exists("head > style#portal-enhancer-styles")?;
    Ok(())
}

#[test]
fn stripe_falls_back_to_document_for_fragments() -> portal_enhancer::Result<()> {
    let page = booted(r#"<section class="section">Hi</section>"#)?;
    page.assert_exists(".racing-stripe:first-child")?;
    page.assert_exists(".racing-stripe + section")?;
    Ok(())
}
