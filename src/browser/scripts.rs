//! JavaScript evaluated inside the directory page.
//!
//! Every script is a self-invoking expression returning JSON-serializable
//! data. Arguments are embedded as JSON literals.

/// Locates the "next page" control: an explicit "pagina successiva" link, or
/// any button/link whose text is exactly `>`.
const FIND_NEXT: &str = r#"
    const label = el => ((el.tagName === 'INPUT' ? el.value : el.textContent) || '').trim();
    const next = document.querySelector("a[title*='successiva' i]")
        || Array.from(document.querySelectorAll("button, input[type='button'], input[type='submit'], a"))
            .find(el => label(el) === '>');
"#;

/// `"missing"`, `"hidden"` or `"available"`.
pub fn next_control_state() -> String {
    format!(
        r#"(() => {{
            {find}
            if (!next) return 'missing';
            const rect = next.getBoundingClientRect();
            const style = window.getComputedStyle(next);
            const shown = rect.width > 0 && rect.height > 0
                && style.visibility !== 'hidden' && style.display !== 'none';
            return shown ? 'available' : 'hidden';
        }})()"#,
        find = FIND_NEXT
    )
}

/// Clicks the "next page" control; `false` when it is missing.
pub fn click_next() -> String {
    format!(
        r#"(() => {{
            {find}
            if (!next) return false;
            next.click();
            return true;
        }})()"#,
        find = FIND_NEXT
    )
}

/// `true` once the select has real options (more than one, not all `-`).
pub fn options_ready(selector: &str) -> String {
    format!(
        r#"(() => {{
            const s = document.querySelector({selector});
            if (!s) return false;
            const opts = Array.from(s.options).map(o => (o.textContent || '').trim());
            return opts.length > 1 && !opts.every(t => t === '-' || t === '');
        }})()"#,
        selector = json(selector)
    )
}

/// Selects the first option whose trimmed, case-insensitive label matches
/// one of `labels` and fires `change`. Returns the selected label, or an
/// empty string when nothing matched.
pub fn select_by_label(selector: &str, labels: &[String]) -> String {
    format!(
        r#"(() => {{
            const s = document.querySelector({selector});
            if (!s) return '';
            const options = Array.from(s.options);
            for (const wanted of {labels}) {{
                const w = wanted.trim().toUpperCase();
                const opt = options.find(o => (o.textContent || '').trim().toUpperCase() === w);
                if (opt) {{
                    s.value = opt.value;
                    s.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    s.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return (opt.textContent || '').trim();
                }}
            }}
            return '';
        }})()"#,
        selector = json(selector),
        labels = json(labels)
    )
}

/// Selects the placeholder (first) option, meaning "any".
pub fn select_first(selector: &str) -> String {
    format!(
        r#"(() => {{
            const s = document.querySelector({selector});
            if (!s || s.options.length === 0) return false;
            s.selectedIndex = 0;
            s.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()"#,
        selector = json(selector)
    )
}

/// Clicks the submit control labelled `label`; `false` when not found.
pub fn submit(label: &str) -> String {
    format!(
        r#"(() => {{
            const label = {label};
            const el = Array.from(document.querySelectorAll("input[type='submit'], input[type='button']"))
                    .find(i => (i.value || '').trim() === label)
                || Array.from(document.querySelectorAll('button'))
                    .find(b => (b.textContent || '').includes(label));
            if (!el) return false;
            el.click();
            return true;
        }})()"#,
        label = json(label)
    )
}

fn json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_are_json_literals() {
        let script = select_by_label("select[name='prv']", &["REGGIO NELL'EMILIA".to_string()]);
        assert!(script.contains(r#"document.querySelector("select[name='prv']")"#));
        assert!(script.contains(r#"["REGGIO NELL'EMILIA"]"#));
    }

    #[test]
    fn test_next_scripts_share_lookup() {
        assert!(next_control_state().contains("successiva"));
        assert!(click_next().contains("successiva"));
    }
}
