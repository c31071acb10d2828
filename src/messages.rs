//! Localized user-facing strings.
//!
//! Everything the REPL prints and every `message` field the API returns
//! comes from here, keyed by [`ErrorKind`] or [`Text`] and selected by
//! [`Locale`].

use crate::types::{join_numbers, ErrorKind, Locale};

/// Fixed UI strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Title,
    Welcome,
    Prompt,
    Help,
    HistoryEmpty,
    HistoryHeader,
    SamplesHeader,
    SelfCheckHeader,
    Stored,
    ValidProgression,
    CommonDifference,
    Expected,
    Passed,
    Failed,
    UnknownCommand,
    Goodbye,
}

pub fn text(locale: Locale, key: Text) -> &'static str {
    match locale {
        Locale::En => match key {
            Text::Title => "Echo Chamber of Numeria",
            Text::Welcome => {
                "Each echo in this chamber is an arithmetic progression. \
                 Give it a sequence and it will tell you the next number."
            }
            Text::Prompt => "echo> ",
            Text::Help => {
                "Commands:\n  \
                 predict <numbers>   predict the next number (or just type the numbers)\n  \
                 validate <numbers>  check a sequence without storing it\n  \
                 history             show previous predictions\n  \
                 clear               forget all previous predictions\n  \
                 samples             show sample sequences\n  \
                 test                run the built-in self-check\n  \
                 help                show this help\n  \
                 quit                leave the chamber"
            }
            Text::HistoryEmpty => "The chamber has no memories yet.",
            Text::HistoryHeader => "Memories of the chamber:",
            Text::SamplesHeader => "Sample sequences:",
            Text::SelfCheckHeader => "Self-check:",
            Text::Stored => "This echo has been stored in memory.",
            Text::ValidProgression => "Valid arithmetic progression.",
            Text::CommonDifference => "Common difference",
            Text::Expected => "expected",
            Text::Passed => "PASSED",
            Text::Failed => "FAILED",
            Text::UnknownCommand => "Unknown command. Type `help` for the list of commands.",
            Text::Goodbye => "Farewell. May the patterns guide you.",
        },
        Locale::Es => match key {
            Text::Title => "Cámara de Ecos de Numeria",
            Text::Welcome => {
                "Cada eco de esta cámara es una progresión aritmética. \
                 Dale una secuencia y te dirá el siguiente número."
            }
            Text::Prompt => "eco> ",
            Text::Help => {
                "Comandos:\n  \
                 predict <números>   predecir el siguiente número (o escribe solo los números)\n  \
                 validate <números>  validar una secuencia sin guardarla\n  \
                 history             ver predicciones anteriores\n  \
                 clear               borrar todos los recuerdos\n  \
                 samples             ver secuencias de ejemplo\n  \
                 test                ejecutar la autocomprobación\n  \
                 help                mostrar esta ayuda\n  \
                 quit                salir de la cámara"
            }
            Text::HistoryEmpty => "La cámara aún no tiene recuerdos.",
            Text::HistoryHeader => "Recuerdos de la cámara:",
            Text::SamplesHeader => "Secuencias de ejemplo:",
            Text::SelfCheckHeader => "Autocomprobación:",
            Text::Stored => "Este eco se ha guardado en la memoria.",
            Text::ValidProgression => "Progresión aritmética válida.",
            Text::CommonDifference => "Diferencia común",
            Text::Expected => "esperado",
            Text::Passed => "CORRECTO",
            Text::Failed => "FALLIDO",
            Text::UnknownCommand => "Comando desconocido. Escribe `help` para ver los comandos.",
            Text::Goodbye => "Adiós. Que los patrones te guíen.",
        },
    }
}

pub fn error(locale: Locale, kind: ErrorKind) -> &'static str {
    match (locale, kind) {
        (Locale::En, ErrorKind::NotAnArray) => "Input must be an array of numbers.",
        (Locale::En, ErrorKind::TooShort) => "Sequence must contain at least 2 numbers.",
        (Locale::En, ErrorKind::NonNumeric) => "All sequence elements must be valid numbers.",
        (Locale::En, ErrorKind::NotArithmetic) => {
            "Not an arithmetic progression: the differences are not uniform."
        }
        (Locale::Es, ErrorKind::NotAnArray) => "La secuencia debe ser un array de números.",
        (Locale::Es, ErrorKind::TooShort) => {
            "Se necesitan al menos 2 números para identificar un patrón."
        }
        (Locale::Es, ErrorKind::NonNumeric) => "Todos los elementos deben ser números válidos.",
        (Locale::Es, ErrorKind::NotArithmetic) => {
            "No es una progresión aritmética: las diferencias no son uniformes."
        }
    }
}

/// [`error`] plus, when known, the differences that broke the progression.
pub fn rejection(locale: Locale, kind: ErrorKind, differences: Option<&[f64]>) -> String {
    let base = error(locale, kind);
    match differences {
        Some(d) if !d.is_empty() => match locale {
            Locale::En => format!("{base} Differences are: {}", join_numbers(d)),
            Locale::Es => format!("{base} Diferencias: {}", join_numbers(d)),
        },
        _ => base.to_string(),
    }
}

pub fn sample_name(locale: Locale, key: &str) -> &'static str {
    match (locale, key) {
        (Locale::En, "basic") => "Basic progression",
        (Locale::En, "even") => "Even numbers",
        (Locale::En, "decreasing") => "Decreasing sequence",
        (Locale::En, "large") => "Large numbers",
        (Locale::En, "negative") => "Negative numbers",
        (Locale::En, "step_one") => "Difference of 1",
        (Locale::En, "two_numbers") => "Only two numbers",
        (Locale::En, "constant") => "Equal numbers",
        (Locale::En, "non_arithmetic") => "Powers of two (not arithmetic)",
        (Locale::Es, "basic") => "Secuencia básica",
        (Locale::Es, "even") => "Números pares",
        (Locale::Es, "decreasing") => "Secuencia decreciente",
        (Locale::Es, "large") => "Números grandes",
        (Locale::Es, "negative") => "Números negativos",
        (Locale::Es, "step_one") => "Diferencia de 1",
        (Locale::Es, "two_numbers") => "Solo dos números",
        (Locale::Es, "constant") => "Números iguales",
        (Locale::Es, "non_arithmetic") => "Potencias de dos (no aritmética)",
        (Locale::En, _) => "Unnamed sample",
        (Locale::Es, _) => "Ejemplo sin nombre",
    }
}

pub fn prediction(locale: Locale, next: f64) -> String {
    match locale {
        Locale::En => format!("The next number in the sequence is: {next}"),
        Locale::Es => format!("El siguiente número de la secuencia es: {next}"),
    }
}

pub fn cleared(locale: Locale, removed: usize) -> String {
    match locale {
        Locale::En => format!("Removed {removed} memories from the chamber."),
        Locale::Es => format!("Se eliminaron {removed} recuerdos."),
    }
}

pub fn success_rate(locale: Locale, passed: usize, failed: usize, rate: f64) -> String {
    match locale {
        Locale::En => format!("Passed: {passed}  Failed: {failed}  Success rate: {rate:.2}%"),
        Locale::Es => format!("Correctos: {passed}  Fallidos: {failed}  Tasa de éxito: {rate:.2}%"),
    }
}
