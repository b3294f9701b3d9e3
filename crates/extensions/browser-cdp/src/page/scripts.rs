//! JavaScript snippets evaluated in the page.
//!
//! Elements are addressed through a `data-fp-ref` attribute stamped on first
//! query. The value carries a per-document nonce, so refs taken before a
//! navigation never resolve in the new document.

use feedpilot_protocols::{Decoration, ElementRef};

/// Binding the mutation observer calls once per mutation batch.
pub const MUTATION_BINDING: &str = "__fpDomChanged";

const HELPERS: &str = r#"
const __fpDoc = window.__fpDoc || (window.__fpDoc = Math.random().toString(36).slice(2, 10));
const __fpFind = (ref) => document.querySelector('[data-fp-ref="' + CSS.escape(ref) + '"]');
const __fpStamp = (el) => {
  if (!el.dataset.fpRef || !el.dataset.fpRef.startsWith(__fpDoc)) {
    window.__fpSeq = (window.__fpSeq || 0) + 1;
    el.dataset.fpRef = __fpDoc + '-' + window.__fpSeq;
  }
  return el.dataset.fpRef;
};
"#;

fn js_string(value: &str) -> String {
    // A JSON string literal is a valid JS string literal.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn wrap(body: &str) -> String {
    format!("(() => {{{}\n{}\n}})()", HELPERS, body)
}

/// Install the mutation observer in the current document. Idempotent.
pub fn observer_install() -> String {
    format!(
        r#"(() => {{
  if (window.__fpObserver) return true;
  const notify = () => {{
    if (typeof window.{binding} === 'function') window.{binding}('');
  }};
  const observer = new MutationObserver(notify);
  observer.observe(document, {{
    childList: true,
    subtree: true,
    attributes: true,
    attributeFilter: ['class', 'style', 'hidden', 'disabled', 'aria-hidden', 'aria-expanded'],
  }});
  window.__fpObserver = observer;
  return true;
}})()"#,
        binding = MUTATION_BINDING
    )
}

/// Refs of every element matching `selector`, in document order.
pub fn query_all(selector: &str) -> String {
    wrap(&format!(
        "return Array.from(document.querySelectorAll({})).map(__fpStamp);",
        js_string(selector)
    ))
}

/// Refs of the descendants of `scope` matching `selector`; `null` when the
/// scope is gone.
pub fn query_within(scope: &ElementRef, selector: &str) -> String {
    wrap(&format!(
        r#"const scope = __fpFind({});
if (!scope) return null;
return Array.from(scope.querySelectorAll({})).map(__fpStamp);"#,
        js_string(scope.as_str()),
        js_string(selector)
    ))
}

/// Snapshot of an element, `null` when it is gone.
pub fn inspect(element: &ElementRef) -> String {
    wrap(&format!(
        r#"const el = __fpFind({});
if (!el) return null;
const r = el.getBoundingClientRect();
const s = window.getComputedStyle(el);
return {{
  tag: el.tagName.toLowerCase(),
  text: (el.innerText || el.textContent || '').trim(),
  ariaLabel: el.getAttribute('aria-label'),
  id: el.id || null,
  href: el.href || el.getAttribute('href'),
  disabled: el.disabled === true,
  rect: {{ top: r.top, left: r.left, width: r.width, height: r.height }},
  display: s.display,
  visibility: s.visibility,
  opacity: s.opacity,
}};"#,
        js_string(element.as_str())
    ))
}

/// Resolve a click target.
///
/// Returns the element's center when it is the topmost element there, so the
/// click can be dispatched as real mouse input. Otherwise clicks it from
/// script and returns no point. `null` when the element is gone.
pub fn click_target(element: &ElementRef) -> String {
    wrap(&format!(
        r#"const el = __fpFind({});
if (!el) return null;
const r = el.getBoundingClientRect();
const x = r.left + r.width / 2;
const y = r.top + r.height / 2;
const inView = x >= 0 && y >= 0 && x < window.innerWidth && y < window.innerHeight;
const hit = inView ? document.elementFromPoint(x, y) : null;
if (hit && (hit === el || el.contains(hit))) return {{ found: true, point: {{ x, y }} }};
el.click();
return {{ found: true, point: null }};"#,
        js_string(element.as_str())
    ))
}

pub fn scroll_into_view(element: &ElementRef) -> String {
    wrap(&format!(
        r#"const el = __fpFind({});
if (!el) return false;
el.scrollIntoView({{ behavior: 'smooth', block: 'center' }});
return true;"#,
        js_string(element.as_str())
    ))
}

pub const CLICK_BODY: &str = "document.body ? (document.body.click(), true) : false";

/// Decorate the post container around `element`.
///
/// Returns `null` when the element is gone and `false` when it has no post
/// container. A container is decorated at most once.
pub fn decorate(element: &ElementRef, decoration: Decoration) -> String {
    let apply = match decoration {
        Decoration::Mask => MASK,
        Decoration::Highlight => HIGHLIGHT,
    };
    wrap(&format!(
        r#"const el = __fpFind({});
if (!el) return null;
const container = el.closest('.feed-shared-update-v2__control-menu-container');
if (!container) return false;
if (container.dataset.fpDecorated) return true;
container.dataset.fpDecorated = {};
const wrapper = document.createElement('div');
while (container.firstChild) wrapper.appendChild(container.firstChild);
wrapper.style.transition = 'all 0.3s ease';
wrapper.style.width = '100%';
wrapper.style.height = '100%';
wrapper.style.position = 'relative';
container.style.position = 'relative';
{}
return true;"#,
        js_string(element.as_str()),
        js_string(decoration_name(decoration)),
        apply
    ))
}

fn decoration_name(decoration: Decoration) -> &'static str {
    match decoration {
        Decoration::Mask => "mask",
        Decoration::Highlight => "highlight",
    }
}

const MASK: &str = r#"
wrapper.style.filter = 'blur(10px)';
wrapper.style.opacity = '0.95';
const button = document.createElement('button');
button.innerText = 'Click to View';
Object.assign(button.style, {
  position: 'absolute', top: '50%', left: '50%', transform: 'translate(-50%, -50%)',
  zIndex: '10', backgroundColor: '#0a66c2', color: 'white', border: 'none',
  padding: '12px 24px', fontSize: '14px', borderRadius: '24px', cursor: 'pointer',
  fontWeight: '600', boxShadow: '0 0 10px rgba(0,0,0,0.1)', transition: 'all 0.2s ease',
});
button.onmouseover = () => { button.style.backgroundColor = '#004182'; };
button.onmouseout = () => { button.style.backgroundColor = '#0a66c2'; };
button.addEventListener('click', () => {
  wrapper.style.filter = '';
  wrapper.style.opacity = '1';
  button.style.display = 'none';
});
container.appendChild(wrapper);
container.appendChild(button);
"#;

const HIGHLIGHT: &str = r#"
Object.assign(wrapper.style, {
  backgroundColor: 'rgba(0, 128, 128, 0.1)', borderRadius: '8px',
  border: '2px solid rgba(0, 128, 128, 0.7)', boxShadow: '0 0 10px rgba(0, 128, 128, 0.3)',
});
const badge = document.createElement('div');
badge.innerText = 'AI Job';
Object.assign(badge.style, {
  position: 'absolute', top: '10px', right: '10px', backgroundColor: 'magenta',
  color: 'white', padding: '3px 8px', borderRadius: '12px', fontSize: '12px',
  fontWeight: 'bold', zIndex: '5',
});
container.appendChild(wrapper);
container.appendChild(badge);
"#;
