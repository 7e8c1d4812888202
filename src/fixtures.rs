//! Fixture record factories.
//!
//! The legacy pages scattered ad-hoc mock generators through production
//! code; here they live in one place, used only by the `Mock` data source
//! and the test binaries.

use crate::record::Record;
use crate::status::{ServiceStatus, ALL_STATUSES};
use rand::prelude::*;

const CLIENTS: &[&str] = &[
    "Imobiliaria Central",
    "Rede Horizonte",
    "Casa & Cia",
    "Viver Imoveis",
    "Atlantica Negocios",
];

const PHOTOGRAPHERS: &[&str] = &[
    "Joao Silva",
    "Maria Santos",
    "Pedro Costa",
    "Ana Oliveira",
];

const SERVICE_TYPES: &[&str] = &["Fotos", "Video", "Tour 360", "Fotos + Video", "Drone"];

const BROKERS: &[&str] = &["Carlos Mendes", "Fernanda Lopes", "Ricardo Teixeira"];

const NETWORKS: &[&str] = &["Rede Horizonte", "Atlantica Negocios"];

/// Build one service-request record with the given coordinates.
pub fn solicitacao(
    id: &str,
    status: ServiceStatus,
    cliente: &str,
    fotografo: &str,
    data_agendamento: &str,
) -> Record {
    Record::from_pairs([
        ("ID", id),
        ("Status", status.label()),
        ("Cliente", cliente),
        ("Fotografo", fotografo),
        ("Data do agendamento", data_agendamento),
        ("Tipo do Servico", "Fotos"),
        ("Endereco do Imovel", "Rua das Flores, 100"),
        ("Contato", "(11) 99999-0000"),
        ("Observacoes", ""),
        ("Faturado", "Nao"),
    ])
}

/// A batch of randomized service requests, ids `SR-1..SR-n`.
pub fn sample_solicitacoes(n: usize) -> Vec<Record> {
    let mut rng = thread_rng();
    (1..=n)
        .map(|i| {
            let status = *ALL_STATUSES.choose(&mut rng).unwrap();
            let cliente = CLIENTS.choose(&mut rng).unwrap();
            let fotografo = PHOTOGRAPHERS.choose(&mut rng).unwrap();
            let day = rng.gen_range(1..=28);
            let mut rec = solicitacao(
                &format!("SR-{i}"),
                status,
                cliente,
                fotografo,
                &format!("2025-08-{day:02} 10:00:00"),
            );
            rec.set("Tipo do Servico", *SERVICE_TYPES.choose(&mut rng).unwrap());
            rec
        })
        .collect()
}

/// The reference photographer set.
pub fn sample_fotografos() -> Vec<Record> {
    PHOTOGRAPHERS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Record::from_pairs([
                ("ID", format!("F-{}", i + 1)),
                ("Nome", (*name).to_string()),
                ("Contato", format!("(11) 98888-00{:02}", i + 1)),
                ("Servicos", "0".to_string()),
            ])
        })
        .collect()
}

/// The reference client set.
pub fn sample_clientes() -> Vec<Record> {
    CLIENTS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Record::from_pairs([
                ("ID", format!("C-{}", i + 1)),
                ("Nome", (*name).to_string()),
                ("Rede", "Rede Horizonte".to_string()),
                ("Endereco", "Av. Paulista, 1000".to_string()),
            ])
        })
        .collect()
}

/// The reference broker set.
pub fn sample_corretores() -> Vec<Record> {
    BROKERS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Record::from_pairs([
                ("ID", format!("B-{}", i + 1)),
                ("Nome", (*name).to_string()),
                ("Imobiliaria", "Imobiliaria Central".to_string()),
                ("Contato", format!("(11) 97777-00{:02}", i + 1)),
            ])
        })
        .collect()
}

/// The reference network set.
pub fn sample_redes() -> Vec<Record> {
    NETWORKS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            Record::from_pairs([
                ("ID", format!("R-{}", i + 1)),
                ("Nome", (*name).to_string()),
                ("Regiao", "Sao Paulo".to_string()),
            ])
        })
        .collect()
}

/// Dashboard users for the mock source; plaintext credentials, as in the
/// spreadsheet they stand in for.
pub fn sample_usuarios() -> Vec<Record> {
    vec![
        Record::from_pairs([
            ("Email", "gestor@example.com"),
            ("Senha", "gestor123"),
            ("Nome", "Gestor Demo"),
            ("Role", "gestor"),
        ]),
        Record::from_pairs([
            ("Email", "foto@example.com"),
            ("Senha", "foto123"),
            ("Nome", "Fotografo Demo"),
            ("Role", "fotografo"),
        ]),
    ]
}

/// Records for a logical source name, as the `Mock` data source serves them.
pub fn records_for(source_name: &str) -> Vec<Record> {
    match source_name {
        "Solicitacao" | "Solicitacoes" => sample_solicitacoes(40),
        "Fotografos" => sample_fotografos(),
        "Clientes" => sample_clientes(),
        "Corretores" => sample_corretores(),
        "Rede" | "Redes" => sample_redes(),
        "Usuarios" => sample_usuarios(),
        _ => Vec::new(),
    }
}
