use super::*;

#[test]
fn text_content_concatenates_descendant_text() -> Result<()> {
    let html = "<div id='box'>Hello <span>nested</span> world</div>";

    let h = Harness::from_html(html)?;
    h.assert_text("#box", "Hello nested world")?;
    Ok(())
}

#[test]
fn comments_and_doctype_are_skipped() -> Result<()> {
    let html = r#"
        <!doctype html>
        <!-- navigation disabled upstream -->
        <div id='box'>ok</div>
        <!-- trailing -->
        "#;

    let h = Harness::from_html(html)?;
    h.assert_text("#box", "ok")?;
    Ok(())
}

#[test]
fn unclosed_comment_is_a_parse_error() {
    let err = Harness::from_html("<div><!-- open forever</div>").unwrap_err();
    assert_eq!(err, Error::HtmlParse("unclosed HTML comment".into()));
}

#[test]
fn void_tags_do_not_swallow_siblings() -> Result<()> {
    let html = r#"
        <div id='box'>
          first<br>
          <img src='/pic.png'>
          <a id='link' target='_blank' href='/after-void'>after</a>
        </div>
        "#;

    let mut h = Harness::from_html(html)?;
    h.click("#link")?;
    h.assert_location("/after-void")?;
    Ok(())
}

#[test]
fn bare_and_unquoted_attributes_parse() -> Result<()> {
    let html = "<a id=link target=_blank href=/unquoted disabled>go</a>";

    let mut h = Harness::from_html(html)?;
    assert_eq!(
        h.dom().attr(h.dom().by_id("link").unwrap(), "disabled"),
        Some("true")
    );
    h.click("#link")?;
    h.assert_location("/unquoted")?;
    Ok(())
}

#[test]
fn uppercase_markup_is_normalized() -> Result<()> {
    let html = "<A ID='link' TARGET='_Blank' HREF='/upper'>go</A>";

    let mut h = Harness::from_html(html)?;
    h.click("#link")?;
    h.assert_location("/upper")?;
    Ok(())
}

#[test]
fn script_bodies_stay_inert_text() -> Result<()> {
    // Markup-looking content inside a script must not create elements;
    // the original workaround was itself script, and documents carrying
    // scripts are plain data here.
    let html = r#"
        <script id='code'>
          var markup = '<a id="ghost" target="_blank" href="/ghost">x</a>';
          if (1 < 2) { markup = markup + '</div>'; }
        </script>
        <div id='box'>visible</div>
        "#;

    let h = Harness::from_html(html)?;
    h.assert_text("#box", "visible")?;
    assert!(h.dom().by_id("ghost").is_none());
    assert!(h.inspect_click("#code").is_ok());
    Ok(())
}

#[test]
fn style_bodies_stay_inert_text() -> Result<()> {
    let html = r#"
        <style>a[target="_blank"] { color: red; }</style>
        <a id='link' target='_blank' href='/styled'>go</a>
        "#;

    let mut h = Harness::from_html(html)?;
    h.click("#link")?;
    h.assert_location("/styled")?;
    Ok(())
}

#[test]
fn unclosed_script_is_a_parse_error() {
    let err = Harness::from_html("<script>var a = 1;").unwrap_err();
    assert_eq!(err, Error::HtmlParse("unclosed <script>".into()));
}

#[test]
fn stray_end_tags_recover_without_losing_later_content() -> Result<()> {
    let html = "<div><span>text</div><a id='link' target='_blank' href='/recovered'>go</a>";

    let mut h = Harness::from_html(html)?;
    h.click("#link")?;
    h.assert_location("/recovered")?;
    Ok(())
}

#[test]
fn tag_class_and_attribute_selectors_match() -> Result<()> {
    let html = r#"
        <nav>
          <a class='menu primary' href='/a' target='_self'>A</a>
          <a class='menu' href='/b' target='_blank'>B</a>
        </nav>
        <a rel='noopener' href='/c' target='_blank'>C</a>
        "#;

    let mut h = Harness::from_html(html)?;
    h.assert_exists("nav")?;
    h.assert_exists(".menu.primary")?;
    h.assert_exists("a[rel='noopener']")?;
    h.assert_exists("[target=_blank]")?;

    h.click("nav > a.menu[target=_blank]")?;
    h.assert_location("/b")?;
    Ok(())
}

#[test]
fn descendant_combinator_and_groups_match() -> Result<()> {
    let html = r#"
        <section>
          <div><a id='deep' href='/deep' target='_blank'>deep</a></div>
        </section>
        "#;

    let mut h = Harness::from_html(html)?;
    h.assert_exists("section a")?;
    h.assert_exists("p, section a")?;
    h.click("section div > a")?;
    h.assert_location("/deep")?;
    Ok(())
}

#[test]
fn id_fast_path_and_universal_selector_work() -> Result<()> {
    let html = "<div id='only'><span>x</span></div>";

    let h = Harness::from_html(html)?;
    h.assert_exists("#only")?;
    h.assert_exists("*")?;
    Ok(())
}

#[test]
fn unsupported_selector_syntax_is_rejected() {
    let h = Harness::from_html("<div id='box'></div>").unwrap();

    let err = h.assert_exists("div:hover").unwrap_err();
    assert!(matches!(err, Error::UnsupportedSelector(_)));

    let err = h.assert_exists("div >").unwrap_err();
    assert!(matches!(err, Error::UnsupportedSelector(_)));

    let err = h.assert_exists("[unclosed").unwrap_err();
    assert!(matches!(err, Error::UnsupportedSelector(_)));
}

#[test]
fn missing_selector_surfaces_as_not_found() {
    let mut h = Harness::from_html("<div id='box'></div>").unwrap();
    let err = h.click("#absent").unwrap_err();
    assert_eq!(err, Error::SelectorNotFound("#absent".into()));
}
