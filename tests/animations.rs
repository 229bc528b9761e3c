use portal_enhancer::{ENHANCER_STYLESHEET, EnhancerConfig, Page};

const SECTIONS_PAGE: &str = r#"
<html>
<head><title>Courses</title></head>
<body>
  <div id="s1" class="section">Available courses</div>
  <div id="s2" class="section">My enrollments</div>
  <div id="s3" class="section">Grades</div>
</body>
</html>
"#;

const TABLE_PAGE: &str = r#"
<body>
  <table id="courses">
    <thead><tr id="head"><th>Code</th><th>Title</th></tr></thead>
    <tbody>
      <tr id="r1"><td>CS101</td><td>Intro to Programming</td></tr>
      <tr id="r2"><td>CS205</td><td>Databases</td></tr>
      <tr id="r3"><td>MA110</td><td>Calculus</td></tr>
    </tbody>
  </table>
</body>
"#;

const BUTTON_PAGE: &str = r#"
<body>
  <a id="primary" class="btn btn-primary" href="/courses"><span id="label">Browse</span></a>
  <button id="plain" type="button">Plain</button>
</body>
"#;

fn booted(html: &str) -> portal_enhancer::Result<Page> {
    let mut page = Page::from_html(html)?;
    page.boot()?;
    Ok(page)
}

#[test]
fn sections_start_hidden_and_reveal_staggered() -> portal_enhancer::Result<()> {
    let mut page = booted(SECTIONS_PAGE)?;
    for section in ["#s1", "#s2", "#s3"] {
        page.assert_style(section, "opacity", "0")?;
        page.assert_style(section, "transform", "translateY(30px)")?;
    }
    let due: Vec<i64> = page
        .pending_timers()
        .iter()
        .filter(|timer| timer.action == "reveal-section")
        .map(|timer| timer.due_at)
        .collect();
    assert_eq!(due, vec![0, 150, 300]);

    page.run_due_timers()?;
    page.assert_style("#s1", "opacity", "1")?;
    page.assert_style("#s1", "transform", "translateY(0)")?;
    page.assert_style("#s1", "transition", "all 0.6s ease")?;
    page.assert_style("#s2", "opacity", "0")?;

    page.advance_time(150)?;
    page.assert_style("#s2", "opacity", "1")?;
    page.assert_style("#s3", "opacity", "0")?;

    page.advance_time(150)?;
    page.assert_style("#s3", "opacity", "1")?;
    Ok(())
}

#[test]
fn scrolling_reveals_a_section_before_its_timer() -> portal_enhancer::Result<()> {
    let mut page = booted(SECTIONS_PAGE)?;
    page.scroll_into_view("#s3")?;

    page.assert_style("#s3", "opacity", "1")?;
    page.assert_style("#s3", "transform", "translateY(0)")?;
    page.assert_style("#s3", "transition", "")?;
    assert_eq!(
        page.pending_timers()
            .iter()
            .filter(|timer| timer.action == "reveal-section")
            .count(),
        2
    );

    page.flush()?;
    page.assert_style("#s3", "transition", "")?;
    page.assert_style("#s2", "transition", "all 0.6s ease")?;
    Ok(())
}

#[test]
fn reveal_threshold_filters_slight_visibility() -> portal_enhancer::Result<()> {
    let mut page = booted(SECTIONS_PAGE)?;
    page.set_intersection_ratio("#s2", 0.05)?;
    page.assert_style("#s2", "opacity", "0")?;

    page.set_intersection_ratio("#s2", 0.1)?;
    page.assert_style("#s2", "opacity", "1")?;
    Ok(())
}

#[test]
fn section_already_revealed_ignores_later_scrolling() -> portal_enhancer::Result<()> {
    let mut page = booted(SECTIONS_PAGE)?;
    page.advance_time(300)?;
    let before = page.styles("#s1")?;

    page.set_intersection_ratio("#s1", 0.0)?;
    page.scroll_into_view("#s1")?;
    assert_eq!(page.styles("#s1")?, before);
    Ok(())
}

#[test]
fn sections_visible_at_boot_reveal_immediately() -> portal_enhancer::Result<()> {
    let mut page = Page::from_html(SECTIONS_PAGE)?;
    page.set_intersection_ratio("#s2", 1.0)?;
    page.boot()?;

    page.assert_style("#s2", "opacity", "1")?;
    page.assert_style("#s1", "opacity", "0")?;
    assert_eq!(
        page.pending_timers()
            .iter()
            .filter(|timer| timer.action == "reveal-section")
            .count(),
        2
    );
    Ok(())
}

#[test]
fn custom_threshold_comes_from_page_meta() -> portal_enhancer::Result<()> {
    let mut page = booted(
        r#"
        <html>
        <head>
          <meta name="enhancer-config" content='{"revealThreshold": 0.5}'>
        </head>
        <body><div id="s" class="section">Late</div></body>
        </html>
        "#,
    )?;
    assert_eq!(page.config().reveal_threshold, 0.5);
    page.set_intersection_ratio("#s", 0.4)?;
    page.assert_style("#s", "opacity", "0")?;
    page.set_intersection_ratio("#s", 0.5)?;
    page.assert_style("#s", "opacity", "1")?;
    Ok(())
}

#[test]
fn body_rows_slide_in_one_after_another() -> portal_enhancer::Result<()> {
    let mut page = booted(TABLE_PAGE)?;
    page.assert_style("#head", "opacity", "")?;
    for row in ["#r1", "#r2", "#r3"] {
        page.assert_style(row, "opacity", "0")?;
        page.assert_style(row, "transform", "translateX(-20px)")?;
    }

    page.run_due_timers()?;
    page.assert_style("#r1", "opacity", "1")?;
    page.assert_style("#r1", "transform", "translateX(0)")?;
    page.assert_style("#r1", "transition", "all 0.4s ease")?;
    page.assert_style("#r2", "opacity", "0")?;

    page.advance_time(50)?;
    page.assert_style("#r2", "opacity", "1")?;
    page.advance_time(49)?;
    page.assert_style("#r3", "opacity", "0")?;
    page.advance_time(1)?;
    page.assert_style("#r3", "opacity", "1")?;
    Ok(())
}

#[test]
fn row_stagger_continues_across_tables() -> portal_enhancer::Result<()> {
    let page = booted(
        r#"
        <table><tbody><tr id="a1"><td>1</td></tr><tr id="a2"><td>2</td></tr></tbody></table>
        <table><tbody><tr id="b1"><td>3</td></tr></tbody></table>
        "#,
    )?;
    let due: Vec<i64> = page
        .pending_timers()
        .iter()
        .filter(|timer| timer.action == "reveal-row")
        .map(|timer| timer.due_at)
        .collect();
    assert_eq!(due, vec![0, 50, 100]);
    Ok(())
}

#[test]
fn buttons_lift_on_hover_and_rest_on_leave() -> portal_enhancer::Result<()> {
    let mut page = booted(BUTTON_PAGE)?;
    page.hover("#primary")?;
    page.assert_style("#primary", "transform", "translateY(-2px)")?;
    page.unhover("#primary")?;
    page.assert_style("#primary", "transform", "translateY(0)")?;

    page.hover("#plain")?;
    page.assert_style("#plain", "transform", "")?;
    Ok(())
}

#[test]
fn hovering_a_child_does_not_lift_the_button() -> portal_enhancer::Result<()> {
    let mut page = booted(BUTTON_PAGE)?;
    page.hover("#label")?;
    page.assert_style("#primary", "transform", "")?;
    Ok(())
}

#[test]
fn pressing_pulses_until_the_animation_ends() -> portal_enhancer::Result<()> {
    let mut page = booted(BUTTON_PAGE)?;
    page.press("#primary")?;
    assert!(page.has_class("#primary", "pulse")?);
    assert!(page.has_class("#primary", "btn-primary")?);

    page.end_animation("#primary")?;
    assert!(!page.has_class("#primary", "pulse")?);
    assert!(page.has_class("#primary", "btn")?);
    Ok(())
}

#[test]
fn animation_end_on_a_child_settles_the_pulse() -> portal_enhancer::Result<()> {
    let mut page = booted(BUTTON_PAGE)?;
    page.press("#label")?;
    assert!(page.has_class("#primary", "pulse")?);
    page.end_animation("#label")?;
    assert!(!page.has_class("#primary", "pulse")?);
    Ok(())
}

#[test]
fn button_selector_is_configurable() -> portal_enhancer::Result<()> {
    let config = EnhancerConfig {
        button_selector: "button".into(),
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(BUTTON_PAGE, config)?;
    page.boot()?;
    page.hover("#plain")?;
    page.hover("#primary")?;
    page.assert_style("#plain", "transform", "translateY(-2px)")?;
    page.assert_style("#primary", "transform", "")?;
    Ok(())
}

#[test]
fn disabled_button_effects_leave_buttons_static() -> portal_enhancer::Result<()> {
    let config = EnhancerConfig {
        button_effects: false,
        ..EnhancerConfig::default()
    };
    let mut page = Page::from_html_with_config(BUTTON_PAGE, config)?;
    page.boot()?;
    page.hover("#primary")?;
    page.press("#primary")?;
    page.assert_style("#primary", "transform", "")?;
    assert!(!page.has_class("#primary", "pulse")?);
    Ok(())
}

#[test]
fn stylesheet_carries_the_keyframes() -> portal_enhancer::Result<()> {
    let page = booted(SECTIONS_PAGE)?;
    let css = page.text("#portal-enhancer-styles")?;
    assert_eq!(css, ENHANCER_STYLESHEET);
    for keyframes in ["@keyframes shake", "@keyframes pulse", "@keyframes slideIn", ".pulse"] {
        assert!(css.contains(keyframes), "missing {keyframes}");
    }
    Ok(())
}

#[test]
fn console_banner_is_printed_once() -> portal_enhancer::Result<()> {
    let mut page = booted(SECTIONS_PAGE)?;
    page.boot()?;

    let entries = page.console_entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].message.contains("Course Registration System - Powered by Spring Boot"));
    assert_eq!(entries[0].style, "color: #DC0000; font-weight: bold;");
    assert_eq!(entries[1].message, "Forza Ferrari! \u{1f3ce}\u{fe0f}\u{1f4a8}");
    assert_eq!(
        entries[1].style,
        "color: #FFF200; font-size: 20px; font-weight: bold;"
    );
    Ok(())
}

#[test]
fn second_boot_does_not_stack_effects() -> portal_enhancer::Result<()> {
    let mut page = booted(SECTIONS_PAGE)?;
    let timers = page.pending_timers().len();
    page.boot()?;
    assert!(page.is_booted());
    assert_eq!(page.pending_timers().len(), timers);
    page.assert_count(".racing-stripe", 1)?;
    Ok(())
}

#[test]
fn banner_can_be_silenced() -> portal_enhancer::Result<()> {
    let config = EnhancerConfig::from_json(r#"{"consoleBanner": false}"#)?;
    let mut page = Page::from_html_with_config(SECTIONS_PAGE, config)?;
    page.boot()?;
    assert!(page.console_entries().is_empty());
    Ok(())
}
