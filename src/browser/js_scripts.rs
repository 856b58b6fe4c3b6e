//! JavaScript evaluated in the report page

/// Attribute used to tag scanned buttons so a click can target them by ordinal
pub const BUTTON_ATTRIBUTE: &str = "data-scrape-button";

/// Scan for "view more" elements.
///
/// Called as `(FIND_BUTTONS_FN)(labels, phrases)`. Returns
/// `[{ordinal, label, text, context, x, y}]`. Only the deepest visible element
/// carrying a label counts, and one element per 10px bucket is kept. Matches
/// are tagged with `data-scrape-button=<ordinal>`; tags from earlier scans are
/// removed first.
pub const FIND_BUTTONS_FN: &str = r"
(labels, phrases) => {
    const attr = 'data-scrape-button';
    document.querySelectorAll('[' + attr + ']').forEach(el => el.removeAttribute(attr));
    if (!document.body) return [];

    const found = [];
    const seen = new Set();
    for (const el of document.body.querySelectorAll('*')) {
        const text = (el.innerText || '').trim();
        if (!text) continue;
        const label = labels.find(l => text.includes(l));
        if (!label) continue;
        const deeper = Array.from(el.children).some(c => (c.innerText || '').includes(label));
        if (deeper) continue;

        const rect = el.getBoundingClientRect();
        const style = window.getComputedStyle(el);
        if (rect.width === 0 || rect.height === 0) continue;
        if (style.visibility === 'hidden' || style.display === 'none') continue;

        const x = rect.left + window.scrollX;
        const y = rect.top + window.scrollY;
        const bucket = label + '@' + Math.floor(x / 10) + '_' + Math.floor(y / 10);
        if (seen.has(bucket)) continue;
        seen.add(bucket);

        let context = null;
        for (let p = el.parentElement; p && context === null; p = p.parentElement) {
            const around = p.textContent || '';
            context = phrases.find(ph => around.includes(ph)) || null;
        }

        const ordinal = found.length;
        el.setAttribute(attr, String(ordinal));
        found.push({ ordinal, label, text: text.slice(0, 200), context, x, y });
    }
    return found;
}
";

/// Readiness probe used by the idle wait
pub const READINESS_PROBE: &str = r"
({
    ready: document.readyState,
    resources: performance.getEntriesByType('resource').length
})
";

pub const VISIBLE_TEXT: &str = "document.body ? document.body.innerText : ''";

pub const HISTORY_BACK: &str = "window.history.back()";
