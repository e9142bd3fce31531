/// Utilitários para manipulação segura de strings UTF-8

/// Trunca uma string de forma segura, garantindo que o índice não corte no meio de um caractere UTF-8
///
/// # Argumentos
/// * `s` - String a ser truncada
/// * `max_bytes` - Número máximo de bytes a retornar
///
/// # Exemplo
/// ```
/// use distribuidor_senhas::utils::string_utils::truncate_safe;
///
/// let token = "ya29.a0AfH6SMBx";
/// assert_eq!(truncate_safe(token, 4), "ya29");
/// ```
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;

    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Limita uma string a `max_chars` caracteres (não bytes)
///
/// Usado para os campos do formulário, cujo limite é expresso em caracteres.
pub fn limit_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Escapa texto para inserção segura em HTML
///
/// # Exemplo
/// ```
/// use distribuidor_senhas::utils::string_utils::escape_html;
///
/// assert_eq!(escape_html("<b>Zé & Cia</b>"), "&lt;b&gt;Zé &amp; Cia&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
