use link_interceptor::Harness;

#[test]
fn footer_social_links_redirect_the_current_context() -> link_interceptor::Result<()> {
    let html = r#"
    <header>
      <nav class="top">
        <a class="brand" href="/">Home</a>
        <a class="docs" href="/docs" target="_self">Docs</a>
      </nav>
    </header>
    <main>
      <p>Lorem ipsum dolor sit amet.</p>
    </main>
    <footer>
      <ul class="social">
        <li><a rel="noopener" href="https://social.example/us" target="_blank">Follow us</a></li>
        <li><a rel="noopener" href="https://forum.example/" target="_blank">Forum</a></li>
      </ul>
    </footer>
    "#;

    let mut harness = Harness::from_html(html)?;
    harness.click("a[href='https://forum.example/']")?;
    harness.assert_location("https://forum.example/")?;

    harness.click(".social a[href='https://social.example/us']")?;
    harness.assert_location("https://social.example/us")?;

    let navigations = harness.take_link_navigations();
    assert_eq!(navigations.len(), 2);
    assert_eq!(navigations[1].from, "https://forum.example/");
    Ok(())
}

#[test]
fn image_card_clicks_resolve_to_the_wrapping_hyperlink() -> link_interceptor::Result<()> {
    let html = r#"
    <div class="card">
      <a href="https://shop.example/item/42" target="_blank">
        <figure>
          <img src="/thumbs/42.jpg" alt="blue kettle">
          <figcaption>Blue kettle</figcaption>
        </figure>
      </a>
    </div>
    "#;

    let mut harness = Harness::from_html(html)?;
    harness.click("img[alt='blue kettle']")?;
    harness.assert_location("https://shop.example/item/42")?;
    Ok(())
}

#[test]
fn legacy_uppercase_markup_still_triggers_the_interceptor() -> link_interceptor::Result<()> {
    let html = r#"
    <CENTER>
      <A HREF="http://archive.example/page.html" TARGET="_BLANK"><B>Enter site</B></A>
    </CENTER>
    "#;

    let mut harness = Harness::from_html(html)?;
    harness.click("a b")?;
    harness.assert_location("http://archive.example/page.html")?;
    Ok(())
}

#[test]
fn deeply_nested_wrappers_do_not_overflow_the_stack() -> link_interceptor::Result<()> {
    let mut html = String::from("<a id=\"link\" href=\"/deep\" target=\"_blank\">");
    for _ in 0..2_000 {
        html.push_str("<div>");
    }
    html.push_str("<span id=\"origin\">bottom</span>");
    for _ in 0..2_000 {
        html.push_str("</div>");
    }
    html.push_str("</a>");

    let mut harness = Harness::from_html(&html)?;
    harness.click("#origin")?;
    harness.assert_location("/deep")?;
    Ok(())
}

#[test]
fn inline_scripts_with_anchor_markup_never_produce_clickable_links() -> link_interceptor::Result<()> {
    let html = r#"
    <script>
      var banner = '<a id="promo" href="https://ads.example/" target="_blank">buy</a>';
      if (banner.length > 0) { document.title = "promo'd"; }
    </script>
    <a id="real" href="/real" target="_blank">real link</a>
    "#;

    let mut harness = Harness::from_html(html)?;
    assert!(harness.dom().by_id("promo").is_none());
    harness.click("#real")?;
    harness.assert_location("/real")?;
    Ok(())
}

#[test]
fn tracking_decorated_urls_pass_through_unmodified() -> link_interceptor::Result<()> {
    let html = r#"
    <a id="cta" target="_blank"
       href="https://example.com/signup?utm_source=mail&utm_campaign=spring#plans">
      Sign up
    </a>
    "#;

    let mut harness = Harness::from_html(html)?;
    harness.click("#cta")?;
    harness.assert_location("https://example.com/signup?utm_source=mail&utm_campaign=spring#plans")?;
    Ok(())
}
