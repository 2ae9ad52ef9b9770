use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

// 7 或 8 位数字，允许千位分隔点
static DNI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}\.?\d{3}\.?\d{3}$").expect("Invalid DNI regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("El formato del email es inválido");
    }
    Ok(())
}

pub fn validate_dni(dni: &str) -> Result<(), &'static str> {
    if !DNI_RE.is_match(dni) {
        return Err("El DNI debe tener 7 u 8 dígitos");
    }
    Ok(())
}

/// 去掉千位分隔点后的 DNI
pub fn normalize_dni(dni: &str) -> String {
    dni.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn validate_name(field: &'static str, value: &str) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 || len > 100 {
        return Err(format!("{field} debe tener entre 1 y 100 caracteres"));
    }
    Ok(())
}
