use std::fmt;

const HYPERLINK_TAG: &str = "a";
const NEW_CONTEXT_TARGET: &str = "_blank";

/// Read-only capability view of a document tree.
///
/// The interceptor only ever needs three facts about a node: its element
/// tag (if it is an element), its parent, and an attribute value. Keeping
/// the walk behind this trait means the logic runs against any synthetic
/// tree, with no rendering engine in sight.
///
/// Attribute names are queried in lowercase; implementations backed by
/// parsed markup are expected to lowercase attribute names at build time.
pub trait DocumentTree {
    type Node: Copy + Eq + fmt::Debug;

    fn tag(&self, node: Self::Node) -> Option<&str>;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;
}

/// A click delivered by the hosting environment, reduced to the one thing
/// the interceptor reads from it: the origin node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent<N> {
    pub target: N,
}

/// The complete decision space for one click.
///
/// Absent or non-matching attributes are decisions, never errors. The
/// `Navigate` branch keeps `href` optional: a hyperlink may request a new
/// context without declaring a destination, and that case stays visible
/// to the caller instead of being collapsed into an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptDecision<N> {
    /// The walk reached the root without finding a hyperlink element.
    NoHyperlink,
    /// The nearest hyperlink carries no `target` attribute.
    TargetAbsent { hyperlink: N },
    /// `target` is present but does not request a new browsing context.
    TargetNotBlank { hyperlink: N, target: String },
    /// `target="_blank"` (any casing): redirect the current context.
    Navigate { hyperlink: N, href: Option<String> },
}

impl<N> InterceptDecision<N> {
    pub fn navigates(&self) -> bool {
        matches!(self, Self::Navigate { .. })
    }
}

/// Write-only navigation surface of the hosting environment.
///
/// The interceptor issues at most one call per click and never reads the
/// location back; navigation is fire-and-forget from its perspective.
pub trait BrowsingContext {
    fn navigate(&mut self, href: Option<&str>);
}

/// Walks from `origin` (inclusive) toward the root and returns the first
/// node whose tag is a case-insensitive `a`. The tree is finite and
/// rooted, so the walk is bounded by the depth of `origin`.
pub fn nearest_hyperlink<T: DocumentTree>(tree: &T, origin: T::Node) -> Option<T::Node> {
    let mut cursor = Some(origin);
    while let Some(node) = cursor {
        if tree
            .tag(node)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(HYPERLINK_TAG))
        {
            return Some(node);
        }
        cursor = tree.parent(node);
    }
    None
}

/// Classifies a click without side effects.
///
/// The walk stops at the first hyperlink found, whether or not it ends up
/// qualifying for navigation; an inner hyperlink always shadows an outer
/// one.
pub fn decide<T: DocumentTree>(tree: &T, event: &ClickEvent<T::Node>) -> InterceptDecision<T::Node> {
    let Some(hyperlink) = nearest_hyperlink(tree, event.target) else {
        return InterceptDecision::NoHyperlink;
    };

    let Some(target) = tree.attribute(hyperlink, "target") else {
        return InterceptDecision::TargetAbsent { hyperlink };
    };

    if !target.eq_ignore_ascii_case(NEW_CONTEXT_TARGET) {
        return InterceptDecision::TargetNotBlank {
            hyperlink,
            target: target.to_string(),
        };
    }

    InterceptDecision::Navigate {
        hyperlink,
        href: tree.attribute(hyperlink, "href").map(str::to_string),
    }
}

/// Compensates for engines that ignore hyperlinks requesting a new
/// browsing context: a qualifying click is turned into a same-context
/// navigation to the hyperlink's destination.
///
/// The interceptor itself is stateless; registration and lifetime are the
/// owner's concern. A harness attaches one at document load and may
/// detach it again, so the listener never outlives its caller's intent.
#[derive(Debug, Default)]
pub struct LinkClickInterceptor;

impl LinkClickInterceptor {
    pub fn new() -> Self {
        Self
    }

    /// Handles one click: classifies it and, on a new-context request,
    /// issues exactly one navigation on `context`. The destination is
    /// passed through verbatim, absent or empty included; validating it
    /// is the host's business.
    pub fn handle<T, C>(
        &self,
        tree: &T,
        event: &ClickEvent<T::Node>,
        context: &mut C,
    ) -> InterceptDecision<T::Node>
    where
        T: DocumentTree,
        C: BrowsingContext,
    {
        let decision = decide(tree, event);
        if let InterceptDecision::Navigate { href, .. } = &decision {
            context.navigate(href.as_deref());
        }
        decision
    }
}
