//! Menú estático de dominios de consulta.

use std::fmt::Write;

/// Icon set used by the menu, one terminal glyph per icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuIcon {
    FileText,
    Gavel,
    Building,
    Receipt,
    UserX,
    Heart,
    Scale,
    GraduationCap,
    Shield,
}

impl MenuIcon {
    pub fn glifo(self) -> &'static str {
        match self {
            MenuIcon::FileText => "🗎",
            MenuIcon::Gavel => "🔨",
            MenuIcon::Building => "🏛",
            MenuIcon::Receipt => "🧾",
            MenuIcon::UserX => "🚫",
            MenuIcon::Heart => "♥",
            MenuIcon::Scale => "⚖",
            MenuIcon::GraduationCap => "🎓",
            MenuIcon::Shield => "🛡",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: &'static str,
    pub route: &'static str,
    pub icon: MenuIcon,
}

/// Available query domains, in menu order.
pub const MENU: &[MenuEntry] = &[
    MenuEntry { title: "Datos IESS", route: "/datos-iess", icon: MenuIcon::FileText },
    MenuEntry { title: "Citaciones ANT", route: "/citaciones-ant", icon: MenuIcon::FileText },
    MenuEntry { title: "Citación Judicial", route: "/citacion-judicial", icon: MenuIcon::Gavel },
    MenuEntry { title: "Consejo Judicatura", route: "/consejo-judicatura", icon: MenuIcon::Building },
    MenuEntry { title: "Consulta SRI", route: "/consulta-sri", icon: MenuIcon::Receipt },
    MenuEntry { title: "SRI Deudas", route: "/sri-deudas", icon: MenuIcon::Receipt },
    MenuEntry { title: "Impedimentos Cargos Públicos", route: "/impedimentos-cargos", icon: MenuIcon::UserX },
    MenuEntry { title: "Pensión Alimenticia", route: "/pension-alimenticia", icon: MenuIcon::Heart },
    MenuEntry { title: "Procesos Judiciales", route: "/procesos-judiciales", icon: MenuIcon::Scale },
    MenuEntry { title: "Senescyt", route: "/senescyt", icon: MenuIcon::GraduationCap },
    MenuEntry { title: "Super CIAS", route: "/supercias", icon: MenuIcon::Building },
    MenuEntry { title: "Interpol", route: "/interpol", icon: MenuIcon::FileText },
    MenuEntry { title: "Antecedentes Penales", route: "/antecedentes-penales", icon: MenuIcon::Shield },
];

/// The entry whose route equals the given path, if any.
pub fn active_entry(path: &str) -> Option<&'static MenuEntry> {
    MENU.iter().find(|entry| entry.route == path)
}

/// Render the menu, marking the active route.
pub fn render_menu(active_path: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sistema de Consultas");
    let _ = writeln!(out, "Consultas y verificaciones");
    let _ = writeln!(out);
    let _ = writeln!(out, "Consultas Disponibles");
    for entry in MENU {
        let marcador = if entry.route == active_path { "▸" } else { " " };
        let _ = writeln!(
            out,
            "{} {} {:<30} {}",
            marcador,
            entry.icon.glifo(),
            entry.title,
            entry.route
        );
    }
    out
}
