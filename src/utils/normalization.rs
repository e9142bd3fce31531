//! Funções de normalização para cabeçalhos e flags da planilha
//!
//! Os editores da planilha escrevem "Área", "AREA" ou "area" indistintamente,
//! e marcam a coluna "Ativa" com "Sim", "TRUE", "1"... Este módulo compara
//! esses valores usando NFKD (Normalization Form Compatibility Decomposition).

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Valores aceitos como "verdadeiro" na coluna de ativação (já normalizados)
const TRUTHY_VALUES: [&str; 10] = [
    "sim", "s", "true", "1", "y", "yes", "ativo", "ativa", "on", "ok",
];

/// Remove acentos, faz trim e converte para lowercase
///
/// Diferente de uma normalização agressiva, pontuação interna é preservada
/// ("Área/Setor" vira "area/setor").
///
/// # Exemplos
/// ```
/// use distribuidor_senhas::utils::normalization::normalize_key;
///
/// assert_eq!(normalize_key("  Área "), "area");
/// assert_eq!(normalize_key("Disponível"), "disponivel");
/// assert_eq!(normalize_key("Área/Setor"), "area/setor");
/// ```
pub fn normalize_key(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Verifica se o valor de uma célula representa "ativo"
///
/// # Exemplos
/// ```
/// use distribuidor_senhas::utils::normalization::is_truthy;
///
/// assert!(is_truthy("Sim"));
/// assert!(is_truthy("TRUE"));
/// assert!(!is_truthy("Não"));
/// assert!(!is_truthy(""));
/// ```
pub fn is_truthy(value: &str) -> bool {
    let normalized = normalize_key(value);
    TRUTHY_VALUES.contains(&normalized.as_str())
}

/// Localiza a primeira coluna do cabeçalho que casa com algum dos candidatos
///
/// Os candidatos são testados em ordem de prioridade: o primeiro candidato
/// encontrado vence, mesmo que outro apareça antes no cabeçalho.
pub fn find_column_index<S: AsRef<str>>(header: &[S], candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = header.iter().map(|h| normalize_key(h.as_ref())).collect();

    candidates.iter().find_map(|wanted| {
        let wanted = normalize_key(wanted);
        normalized.iter().position(|col| *col == wanted)
    })
}
