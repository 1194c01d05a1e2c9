//! Static page copy: how-it-works steps, FAQ and contact details.
//!
//! This is display data only. Nothing here is computed from the catalog or
//! the cart.

/// One step of the "Como funciona" section.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub title: &'static str,
    pub body: &'static str,
}

/// A question and answer in the FAQ card.
#[derive(Debug, Clone, Copy)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Selling points shown under the hero.
pub const HIGHLIGHTS: &[&str] = &[
    "Entrega por resource",
    "Autoria verificada",
    "Download via Drive/MediaFire",
];

/// The three-step ordering flow.
pub const STEPS: &[Step] = &[
    Step {
        title: "1) Monte seu carrinho",
        body: "Escolha itens apenas para MTA. Nada fora do jogo é vendido aqui.",
    },
    Step {
        title: "2) Abra ticket no Discord",
        body: "Envie o código do carrinho e combine pagamento/entrega com um staff.",
    },
    Step {
        title: "3) Receba por resource",
        body: "Entrega por resource no seu servidor/cidade com validação.",
    },
];

/// Frequently asked questions.
pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "É só para MTA?",
        answer: "Sim. Todos os produtos são pensados para a cidade Brasil Mundo Fênix no MTA.",
    },
    FaqEntry {
        question: "Como pago?",
        answer: "Ticket no Discord. Aceitamos Pix e outras formas combinadas com a staff.",
    },
    FaqEntry {
        question: "Como recebo?",
        answer: "Por resource (instalação guiada) e/ou link de download (Drive/MediaFire) conforme item.",
    },
    FaqEntry {
        question: "Posso pedir algo sob medida?",
        answer: "Sim! Fazemos handling por modelo, sons exclusivos e scripts personalizados.",
    },
];

/// Page copy shared by every template.
#[derive(Debug, Clone)]
pub struct StoreContent {
    pub store_name: &'static str,
    pub tagline: &'static str,
    pub discord_invite: String,
    pub highlights: &'static [&'static str],
    pub steps: &'static [Step],
    pub faq: &'static [FaqEntry],
}

impl StoreContent {
    #[must_use]
    pub fn new(discord_invite: &str) -> Self {
        Self {
            store_name: "Brasil Mundo Fênix",
            tagline: "Loja oficial – Somente para MTA",
            discord_invite: discord_invite.to_string(),
            highlights: HIGHLIGHTS,
            steps: STEPS,
            faq: FAQ,
        }
    }

    /// Invite as a clickable URL.
    #[must_use]
    pub fn discord_url(&self) -> String {
        if self.discord_invite.starts_with("http://") || self.discord_invite.starts_with("https://")
        {
            self.discord_invite.clone()
        } else {
            format!("https://{}", self.discord_invite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discord_url_adds_scheme() {
        let content = StoreContent::new("discord.gg/brasilmundofenix");
        assert_eq!(content.discord_url(), "https://discord.gg/brasilmundofenix");

        let content = StoreContent::new("https://discord.gg/x");
        assert_eq!(content.discord_url(), "https://discord.gg/x");
    }

    #[test]
    fn test_three_steps() {
        assert_eq!(STEPS.len(), 3);
        assert_eq!(FAQ.len(), 4);
    }
}
