//! Locale name model used by the customer generator (es-MX).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::shared::random::GenRng;

const ES_MX_FIRST_NAMES: &[&str] = &[
    "Alejandro", "Ana", "Andrés", "Beatriz", "Carlos", "Carmen", "Daniel", "Diana",
    "Eduardo", "Elena", "Emilio", "Fernanda", "Francisco", "Gabriela", "Guadalupe", "Héctor",
    "Isabel", "Javier", "Jimena", "Jorge", "José", "Juan", "Julia", "Leticia",
    "Lorena", "Luis", "Manuel", "Marco", "María", "Mariana", "Martín", "Miguel",
    "Mónica", "Natalia", "Óscar", "Patricia", "Pedro", "Rafael", "Raúl", "Regina",
    "Ricardo", "Rocío", "Rosa", "Santiago", "Sofía", "Teresa", "Valeria", "Ximena",
];

const ES_MX_LAST_NAMES: &[&str] = &[
    "Aguilar", "Álvarez", "Castillo", "Castro", "Chávez", "Cruz", "Díaz", "Espinoza",
    "Flores", "García", "Gómez", "González", "Guerrero", "Gutiérrez", "Hernández", "Herrera",
    "Jiménez", "López", "Martínez", "Medina", "Mendoza", "Morales", "Moreno", "Muñoz",
    "Núñez", "Ortega", "Ortiz", "Pérez", "Ramírez", "Ramos", "Reyes", "Río",
    "Rivera", "Rodríguez", "Romero", "Rojas", "Ruiz", "Salazar", "Sánchez", "Soto",
    "Torres", "Vargas", "Vázquez", "Vega",
];

const ES_MX_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "hotmail.com",
    "yahoo.com",
    "outlook.com",
    "prodigy.net.mx",
];

/// Name pools the customer generator draws from
#[derive(Debug, Clone)]
pub struct NameModel {
    first_names: Vec<&'static str>,
    last_names: Vec<&'static str>,
    email_domains: Vec<&'static str>,
}

impl NameModel {
    pub fn es_mx() -> Self {
        Self::new(ES_MX_FIRST_NAMES, ES_MX_LAST_NAMES, ES_MX_EMAIL_DOMAINS)
    }

    pub fn new(
        first_names: &[&'static str],
        last_names: &[&'static str],
        email_domains: &[&'static str],
    ) -> Self {
        Self {
            first_names: first_names.to_vec(),
            last_names: last_names.to_vec(),
            email_domains: email_domains.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_names.is_empty() || self.last_names.is_empty() || self.email_domains.is_empty()
    }

    pub fn first_name(&self, rng: &mut GenRng) -> Option<&'static str> {
        self.first_names.choose(rng).copied()
    }

    pub fn last_name(&self, rng: &mut GenRng) -> Option<&'static str> {
        self.last_names.choose(rng).copied()
    }

    /// Candidate address built from a fresh name draw.
    ///
    /// Candidates may repeat; the caller enforces uniqueness.
    pub fn email(&self, rng: &mut GenRng) -> Option<String> {
        let first = mailbox_part(self.first_name(rng)?);
        let last = mailbox_part(self.last_name(rng)?);
        let domain = self.email_domains.choose(rng)?;

        let local = match rng.gen_range(0..5) {
            0 => format!("{first}.{last}"),
            1 => format!("{first}_{last}"),
            2 => format!("{}{last}", first.chars().next().unwrap_or('x')),
            3 => format!("{first}.{last}{:02}", rng.gen_range(0..100)),
            _ => format!("{first}{last}{:02}", rng.gen_range(0..100)),
        };

        Some(format!("{local}@{domain}"))
    }
}

impl Default for NameModel {
    fn default() -> Self {
        Self::es_mx()
    }
}

/// Lowercase ASCII form of a name for use in an address
fn mailbox_part(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            let folded = match c {
                'á' | 'Á' => 'a',
                'é' | 'É' => 'e',
                'í' | 'Í' => 'i',
                'ó' | 'Ó' => 'o',
                'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
                'ñ' | 'Ñ' => 'n',
                other => other.to_ascii_lowercase(),
            };
            folded.is_ascii_alphanumeric().then_some(folded)
        })
        .collect()
}
