use portal_enhancer::{EnhancerConfig, Notification, Page, Severity};

const ADMIN_PAGE: &str = r#"
<html>
<body>
  <table>
    <tbody>
      <tr>
        <td>Ana Lima</td>
        <td>
          <form id="approve" action="/admin/enrollments/7/approve" method="post">
            <button id="approve-btn" type="submit" class="btn btn-success">Approve</button>
          </form>
          <form id="reject" action="/admin/enrollments/7/reject" method="post">
            <button id="reject-btn" type="submit" class="btn btn-danger">Reject</button>
          </form>
        </td>
      </tr>
    </tbody>
  </table>
</body>
</html>
"#;

const GRADE_PAGE: &str = r#"
<html>
<body>
  <form id="grade-form" action="/admin/enrollments/7/grade" method="post">
    <input id="grade" name="grade" type="number">
    <select id="passed" name="passed">
      <option value="true">Passed</option>
      <option value="false">Failed</option>
    </select>
    <button id="save" type="submit" class="btn">Save grade</button>
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
fn declined_approval_cancels_the_click() -> portal_enhancer::Result<()> {
    let mut page = booted(ADMIN_PAGE)?;
    page.enqueue_confirm_response(false);
    page.click("#approve-btn")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Are you sure you want to APPROVE this enrollment?".to_string()]
    );
    assert!(page.take_form_submissions().is_empty());
    assert!(!page.is_disabled("#approve-btn")?);
    Ok(())
}

#[test]
fn accepted_approval_submits_the_form() -> portal_enhancer::Result<()> {
    let mut page = booted(ADMIN_PAGE)?;
    page.click("#approve-btn")?;

    let submissions = page.take_form_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].action, "/admin/enrollments/7/approve");
    assert!(submissions[0].entries.is_empty());
    assert!(page.is_disabled("#approve-btn")?);
    Ok(())
}

#[test]
fn reject_uses_its_own_prompt() -> portal_enhancer::Result<()> {
    let mut page = booted(ADMIN_PAGE)?;
    page.enqueue_confirm_response(true);
    page.enqueue_confirm_response(false);
    page.click("#reject-btn")?;
    page.click("#approve-btn")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec![
            "Are you sure you want to REJECT this enrollment?".to_string(),
            "Are you sure you want to APPROVE this enrollment?".to_string(),
        ]
    );
    let submissions = page.take_form_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].action, "/admin/enrollments/7/reject");
    Ok(())
}

#[test]
fn default_confirm_answer_applies_once_queue_is_empty() -> portal_enhancer::Result<()> {
    let mut page = booted(ADMIN_PAGE)?;
    page.set_default_confirm_response(false);
    page.click("#approve-btn")?;
    page.click("#reject-btn")?;

    assert_eq!(page.take_confirm_messages().len(), 2);
    assert!(page.take_form_submissions().is_empty());
    Ok(())
}

#[test]
fn empty_grade_is_rejected_without_prompt() -> portal_enhancer::Result<()> {
    let mut page = booted(GRADE_PAGE)?;
    page.click("#save")?;

    assert!(page.take_confirm_messages().is_empty());
    assert!(page.take_form_submissions().is_empty());
    assert_eq!(
        page.take_notifications(),
        vec![Notification {
            message: "Please enter a grade".into(),
            severity: Severity::Error,
        }]
    );
    Ok(())
}

#[test]
fn grade_prompt_reports_passed_verdict() -> portal_enhancer::Result<()> {
    let mut page = booted(GRADE_PAGE)?;
    page.type_text("#grade", "87")?;
    page.assert_value("#passed", "true")?;
    page.click("#save")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Submit grade 87 (PASSED)?".to_string()]
    );
    let submissions = page.take_form_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].entries,
        vec![
            ("grade".to_string(), "87".to_string()),
            ("passed".to_string(), "true".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn grade_prompt_follows_manual_override() -> portal_enhancer::Result<()> {
    let mut page = booted(GRADE_PAGE)?;
    page.type_text("#grade", "87")?;
    page.select_option("#passed", "false")?;
    page.enqueue_confirm_response(false);
    page.click("#save")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Submit grade 87 (FAILED)?".to_string()]
    );
    assert!(page.take_form_submissions().is_empty());
    Ok(())
}

#[test]
fn low_grade_defaults_to_failed() -> portal_enhancer::Result<()> {
    let mut page = booted(GRADE_PAGE)?;
    page.type_text("#grade", "42")?;
    page.click("#save")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Submit grade 42 (FAILED)?".to_string()]
    );
    Ok(())
}

#[test]
fn grade_text_is_quoted_as_typed() -> portal_enhancer::Result<()> {
    let mut page = booted(GRADE_PAGE)?;
    page.type_text("#grade", "72.50")?;
    page.click("#save")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Submit grade 72.50 (PASSED)?".to_string()]
    );
    Ok(())
}

#[test]
fn only_literal_true_counts_as_passed() -> portal_enhancer::Result<()> {
    let config = EnhancerConfig {
        grade_validation: false,
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(
        r#"
        <form action="/grade" method="post">
          <input id="grade" name="grade" value="90">
          <select id="passed" name="passed">
            <option value="yes">Yes</option>
            <option value="true">True</option>
          </select>
          <button id="save">Save</button>
        </form>
        "#,
        config,
    )?;
    page.boot()?;
    page.click("#save")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Submit grade 90 (FAILED)?".to_string()]
    );
    Ok(())
}

#[test]
fn missing_passed_select_reports_failed() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <form action="/instructor/grade" method="post">
          <input id="grade" name="grade" value="99">
          <button id="save" type="submit">Save</button>
        </form>
        "#,
    )?;
    page.click("#save")?;

    assert_eq!(
        page.take_confirm_messages(),
        vec!["Submit grade 99 (FAILED)?".to_string()]
    );
    Ok(())
}

#[test]
fn grade_form_without_grade_field_proceeds() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <form action="/admin/grades/export" method="post">
          <button id="export" type="submit">Export</button>
        </form>
        "#,
    )?;
    page.click("#export")?;

    assert!(page.take_confirm_messages().is_empty());
    assert_eq!(page.take_form_submissions().len(), 1);
    Ok(())
}

#[test]
fn unrelated_forms_are_not_confirmed() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <form action="/student/courses" method="get">
          <button id="list" type="submit">List</button>
        </form>
        "#,
    )?;
    page.set_default_confirm_response(false);
    page.click("#list")?;

    assert!(page.take_confirm_messages().is_empty());
    assert_eq!(page.take_form_submissions().len(), 1);
    Ok(())
}
