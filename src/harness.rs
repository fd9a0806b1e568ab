use crate::dom::{Dom, NodeId};
use crate::html::parse_html;
use crate::intercept::{BrowsingContext, ClickEvent, InterceptDecision, LinkClickInterceptor, decide};
use crate::{Error, Result};

const DEFAULT_DOCUMENT_URL: &str = "about:blank";

/// One navigation issued through the interceptor: the URL the context was
/// on when the click happened, and the raw destination. `to` is `None`
/// when the qualifying hyperlink had no `href` attribute at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNavigation {
    pub from: String,
    pub to: Option<String>,
}

/// Deterministic stand-in for the hosting browsing context.
///
/// Clicks delivered through [`Harness::click`] are delegated to the
/// document root the way the real workaround delegates them, handed to
/// the attached [`LinkClickInterceptor`], and any resulting navigation is
/// recorded instead of loading anything. Everything runs on the calling
/// thread; there is no cross-click state beyond the navigation log.
#[derive(Debug)]
pub struct Harness {
    dom: Dom,
    document_url: String,
    link_interceptor: Option<LinkClickInterceptor>,
    link_navigations: Vec<LinkNavigation>,
    trace: bool,
    trace_logs: Vec<String>,
    trace_to_stderr: bool,
}

struct RecordingContext<'a> {
    document_url: &'a mut String,
    navigations: &'a mut Vec<LinkNavigation>,
}

impl BrowsingContext for RecordingContext<'_> {
    fn navigate(&mut self, href: Option<&str>) {
        self.navigations.push(LinkNavigation {
            from: self.document_url.clone(),
            to: href.map(str::to_string),
        });
        // A declared destination is applied verbatim, the empty string
        // included. A missing href is recorded but moves nothing; the
        // reference engine's behavior for an undefined destination is
        // unspecified, so the harness keeps the context where it was.
        if let Some(href) = href {
            *self.document_url = href.to_string();
        }
    }
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_url(DEFAULT_DOCUMENT_URL, html)
    }

    /// Parses the document and attaches a link interceptor, mirroring the
    /// one listener the workaround registers at document load. The handle
    /// stays caller-controlled afterwards; see
    /// [`Harness::detach_link_interceptor`].
    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        let dom = stacker::grow(32 * 1024 * 1024, || parse_html(html))?;
        Ok(Self {
            dom,
            document_url: url.to_string(),
            link_interceptor: Some(LinkClickInterceptor::new()),
            link_navigations: Vec::new(),
            trace: false,
            trace_logs: Vec::new(),
            trace_to_stderr: true,
        })
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn location_href(&self) -> &str {
        &self.document_url
    }

    /// Drains the navigation log.
    pub fn take_link_navigations(&mut self) -> Vec<LinkNavigation> {
        std::mem::take(&mut self.link_navigations)
    }

    /// Removes the interceptor; subsequent clicks fall back to the
    /// engine's native handling, which for new-context requests is to do
    /// nothing at all.
    pub fn detach_link_interceptor(&mut self) -> Option<LinkClickInterceptor> {
        self.link_interceptor.take()
    }

    /// Attaches `interceptor`, replacing any attached one. At most one
    /// click listener is ever registered on the document root.
    pub fn attach_link_interceptor(&mut self, interceptor: LinkClickInterceptor) {
        self.link_interceptor = Some(interceptor);
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    /// Dispatches a click on the first node matching `selector`.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || {
            let target = self.select_one(selector)?;
            self.click_node(target)
        })
    }

    /// Classifies a click on the first node matching `selector` without
    /// dispatching it. Works whether or not an interceptor is attached.
    pub fn inspect_click(&self, selector: &str) -> Result<InterceptDecision<NodeId>> {
        let target = self.select_one(selector)?;
        Ok(decide(&self.dom, &ClickEvent { target }))
    }

    fn click_node(&mut self, target: NodeId) -> Result<()> {
        let label = self.dom.node_label(target);
        self.trace_line(format!("[event] click target={label}"));

        let Some(interceptor) = self.link_interceptor.as_ref() else {
            self.trace_line("[intercept] no interceptor attached, click ignored".to_string());
            return Ok(());
        };

        let mut context = RecordingContext {
            document_url: &mut self.document_url,
            navigations: &mut self.link_navigations,
        };
        let decision = interceptor.handle(&self.dom, &ClickEvent { target }, &mut context);

        let line = match &decision {
            InterceptDecision::NoHyperlink => "[intercept] no hyperlink ancestor".to_string(),
            InterceptDecision::TargetAbsent { .. } => {
                "[intercept] hyperlink has no target attribute".to_string()
            }
            InterceptDecision::TargetNotBlank { target, .. } => {
                format!("[intercept] target {target:?} is not a new-context request")
            }
            InterceptDecision::Navigate { href: Some(href), .. } => {
                format!("[intercept] redirecting current context to {href:?}")
            }
            InterceptDecision::Navigate { href: None, .. } => {
                "[intercept] redirecting current context, href missing".to_string()
            }
        };
        self.trace_line(line);
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_location(&self, expected: &str) -> Result<()> {
        if self.document_url != expected {
            return Err(Error::AssertionFailed {
                selector: "location.href".to_string(),
                expected: expected.to_string(),
                actual: self.document_url.clone(),
                dom_snippet: String::new(),
            });
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn trace_line(&mut self, line: String) {
        if !self.trace {
            return;
        }
        if self.trace_to_stderr {
            eprintln!("{line}");
        }
        self.trace_logs.push(line);
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
