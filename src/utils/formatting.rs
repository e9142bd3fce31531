//! Formatação dos dados do participante antes de gravar na planilha

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

/// DDD fixo aplicado a todos os telefones
const LOCAL_AREA_CODE: &str = "92";

/// Formato de data/hora usado nas colunas de registro e atendimento
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Normaliza números para o padrão local `(92) 98123-1234`
///
/// Remove o código do país (55), mantém os 9 dígitos finais do assinante e
/// força o DDD local. Entradas curtas são completadas com zeros à esquerda.
///
/// # Exemplos
/// ```
/// use distribuidor_senhas::utils::formatting::format_phone_number;
///
/// assert_eq!(format_phone_number("+55 (11) 98123-1234"), "(92) 98123-1234");
/// assert_eq!(format_phone_number(""), "");
/// ```
pub fn format_phone_number(telefone: &str) -> String {
    let mut digits: String = telefone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }

    if digits.starts_with("55") && digits.len() > 11 {
        digits.drain(..2);
    }

    if digits.len() > 11 {
        digits = digits[digits.len() - 11..].to_string();
    }

    let subscriber = if digits.len() >= 9 {
        digits[digits.len() - 9..].to_string()
    } else {
        format!("{:0>9}", digits)
    };

    format!("({}) {}-{}", LOCAL_AREA_CODE, &subscriber[..5], &subscriber[5..])
}

/// Nome em caixa alta, sem espaços externos
pub fn format_name_upper(nome: &str) -> String {
    nome.trim().to_uppercase()
}

/// Formata um instante no fuso configurado (ex.: "America/Manaus")
///
/// Fusos desconhecidos caem no horário local da máquina.
pub fn format_timestamp(instant: DateTime<Utc>, tz_name: &str) -> String {
    match tz_name.parse::<Tz>() {
        Ok(tz) => instant.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => instant.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// Data/hora atual no fuso configurado
pub fn now_str(tz_name: &str) -> String {
    format_timestamp(Utc::now(), tz_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_phone_with_country_code() {
        assert_eq!(format_phone_number("+55 92 98123-1234"), "(92) 98123-1234");
        assert_eq!(format_phone_number("5592981231234"), "(92) 98123-1234");
    }

    #[test]
    fn test_phone_forces_local_area_code() {
        assert_eq!(format_phone_number("(11) 98123-1234"), "(92) 98123-1234");
        assert_eq!(format_phone_number("11 3321-4455"), "(92) 13321-4455");
    }

    #[test]
    fn test_phone_short_input_is_zero_padded() {
        assert_eq!(format_phone_number("1234"), "(92) 00000-1234");
        assert_eq!(format_phone_number("abc"), "");
        assert_eq!(format_phone_number("   "), "");
    }

    #[test]
    fn test_phone_keeps_last_eleven_digits() {
        // 14 dígitos sem prefixo 55: mantém os 11 finais e depois os 9 do assinante
        assert_eq!(format_phone_number("00192981231234"), "(92) 98123-1234");
    }

    #[test]
    fn test_name_upper() {
        assert_eq!(format_name_upper("  maria da conceição "), "MARIA DA CONCEIÇÃO");
        assert_eq!(format_name_upper(""), "");
    }

    #[test]
    fn test_format_timestamp_manaus() {
        // Manaus = UTC-4, sem horário de verão
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 15, 4, 5).unwrap();
        assert_eq!(format_timestamp(instant, "America/Manaus"), "10/03/2025 11:04:05");
        assert_eq!(format_timestamp(instant, "UTC"), "10/03/2025 15:04:05");
    }

    #[test]
    fn test_format_timestamp_unknown_zone_falls_back() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 15, 4, 5).unwrap();
        let expected = instant.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string();
        assert_eq!(format_timestamp(instant, "Lugar/Inexistente"), expected);
    }
}
