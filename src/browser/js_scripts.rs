//! In-page JavaScript snippets evaluated via `Page::evaluate`.
//!
//! Kept as `&'static str` constants so every script is reviewable in one
//! place rather than inlined at call sites.

/// Find the largest scrollable descendant (`scrollHeight > clientHeight`) and
/// return `{selector_path, scroll_top, scroll_height, client_height}`, or
/// `null` if none is found. Used by the container-top scroll strategy.
pub const LARGEST_SCROLLABLE_SCRIPT: &str = r"
(() => {
    let best = null;
    let bestArea = 0;
    const all = document.querySelectorAll('*');
    for (const el of all) {
        if (el.scrollHeight > el.clientHeight + 10) {
            const area = el.clientWidth * el.clientHeight;
            if (area > bestArea) {
                bestArea = area;
                best = el;
            }
        }
    }
    if (!best) return null;
    best.setAttribute('data-gh-scroll-target', 'true');
    return {
        scrollTop: best.scrollTop,
        scrollHeight: best.scrollHeight,
        clientHeight: best.clientHeight,
    };
})()
";

/// Mutate `scrollTop` on the element previously tagged by
/// [`LARGEST_SCROLLABLE_SCRIPT`] (container-top strategy), or on
/// `document.scrollingElement` if no tagged element exists. Returns the
/// achieved delta.
pub const SCROLL_TOP_MUTATE_SCRIPT: &str = r"
(() => {
    const target = document.querySelector('[data-gh-scroll-target]') || document.scrollingElement;
    const before = target.scrollTop;
    target.scrollTop = before + arguments[0];
    return target.scrollTop - before;
})()
";

/// Enumerate currently visible container ids matching `div[id$="__N"]`
/// (`N` any non-negative integer, no upper bound) in document order.
pub const CONTAINER_IDS_SCRIPT: &str = r"
(() => {
    const re = /__\d+$/;
    const out = [];
    document.querySelectorAll('div[id]').forEach((el) => {
        if (re.test(el.id)) out.push(el.id);
    });
    return out;
})()
";

/// Report scroll position relative to the document's maximum scrollable
/// position, and total container count, for end-of-gallery detection.
pub const SCROLL_POSITION_SCRIPT: &str = r"
(() => {
    const se = document.scrollingElement || document.documentElement;
    return {
        scrollTop: se.scrollTop,
        maxScroll: se.scrollHeight - se.clientHeight,
    };
})()
";

/// True if a sentinel element signalling the end of the list is present:
/// class matching `end-of-list`, `no-more-content`, `*end*`, or `*bottom*`.
pub const END_SENTINEL_SCRIPT: &str = r#"
(() => {
    const needles = ['end-of-list', 'no-more-content'];
    const loose = [/end/i, /bottom/i];
    for (const el of document.querySelectorAll('[class]')) {
        const cls = el.className.toString();
        if (needles.some((n) => cls.includes(n))) return true;
        if (loose.some((re) => re.test(cls))) return true;
    }
    return false;
})()
"#;

/// Bring the given element (`document.getElementById(id)`) into view.
pub const SCROLL_INTO_VIEW_SCRIPT: &str = r"
(() => {
    const el = document.getElementById(arguments[0]);
    if (!el) return false;
    el.scrollIntoView({ block: 'end', behavior: 'instant' });
    return true;
})()
";

/// Dispatch a sequence of built-in scroll-triggering events: scroll to
/// document end, a synthetic `scroll` event, and a `wheel` event.
pub const ENHANCED_TRIGGERS_SCRIPT: &str = r"
(() => {
    window.scrollTo(0, document.body.scrollHeight);
    window.dispatchEvent(new Event('scroll'));
    window.dispatchEvent(new WheelEvent('wheel', { deltaY: arguments[0] }));
    return true;
})()
";

/// Advance every scrollable descendant by a fraction of the target distance
/// (manual-element strategy). Returns the number of elements advanced.
pub const MANUAL_ELEMENT_SCRIPT: &str = r"
(() => {
    let count = 0;
    const frac = arguments[0];
    document.querySelectorAll('*').forEach((el) => {
        if (el.scrollHeight > el.clientHeight + 10) {
            el.scrollTop += frac;
            count += 1;
        }
    });
    return count;
})()
";

/// Scroll to the absolute document bottom (used by the network-idle
/// strategy before awaiting network idle out-of-band).
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = r"
(() => {
    window.scrollTo(0, document.body.scrollHeight);
    return true;
})()
";
