use crate::core::rag::models::KnowledgeItem;

/// Tag written into the `source` metadata of every seeded record.
pub const KNOWLEDGE_SOURCE: &str = "Turf Expert DB";

const RUNNING_KNOWLEDGE: &[KnowledgeItem] = &[
    KnowledgeItem {
        topic: "Lesiones",
        content: "Si sientes dolor agudo en la rodilla (rodilla de corredor), reduce el volumen de entrenamiento inmediatamente. Fortalecer los glúteos y caderas ayuda a prevenir esta lesión común.",
    },
    KnowledgeItem {
        topic: "Entrenamiento",
        content: "La regla del 10%: No aumentes tu kilometraje semanal más de un 10% respecto a la semana anterior para evitar sobrecargas y fracturas por estrés.",
    },
    KnowledgeItem {
        topic: "Hidratación",
        content: "Para carreras de menos de una hora, el agua suele ser suficiente. Para esfuerzos de más de 60-90 minutos, es necesario reponer electrolitos y carbohidratos.",
    },
    KnowledgeItem {
        topic: "Velocidad",
        content: "El entrenamiento de intervalos (Fartlek) mejora la capacidad aeróbica. Un ejemplo básico es: 1 minuto rápido, 2 minutos de recuperación suave, repetido 8 veces.",
    },
    KnowledgeItem {
        topic: "Calzado",
        content: "Las zapatillas de correr tienen una vida útil de entre 500 y 800 km. Usarlas más allá de este límite reduce la amortiguación y aumenta el riesgo de lesiones.",
    },
    KnowledgeItem {
        topic: "Descanso",
        content: "El descanso es parte del entrenamiento. Dormir al menos 7-8 horas es crucial para la reparación muscular y la adaptación fisiológica.",
    },
];

/// The running-coach knowledge the seeder loads into the store.
pub fn running_knowledge() -> &'static [KnowledgeItem] {
    RUNNING_KNOWLEDGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_items_are_non_empty_and_unique() {
        let items = running_knowledge();
        assert_eq!(items.len(), 6);

        let topics: HashSet<&str> = items.iter().map(|i| i.topic).collect();
        assert_eq!(topics.len(), items.len());
        assert!(items.iter().all(|i| !i.content.trim().is_empty()));
    }

    #[test]
    fn test_catalog_covers_hydration() {
        let hydration = running_knowledge()
            .iter()
            .find(|i| i.topic == "Hidratación")
            .unwrap();
        assert!(hydration.content.contains("electrolitos"));
    }
}
