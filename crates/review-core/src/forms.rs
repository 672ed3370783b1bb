//! Built-in form definitions

use crate::schema::{FieldSchema, FormDefinition, SectionSchema};
use crate::state::FinalField;

pub const ENVIRONMENTAL_MONITORING: &str = "environmental-monitoring";
pub const WELL_EVALUATION: &str = "well-evaluation";

/// Names accepted by [`builtin`].
pub const BUILTIN_FORMS: [&str; 2] = [ENVIRONMENTAL_MONITORING, WELL_EVALUATION];

/// Choices offered for `generalInfo.wellStatus`. Advisory; any string is stored.
pub const WELL_STATUS_OPTIONS: [&str; 3] =
    ["En suspensión", "En proceso de abandono", "Abandonado"];

pub fn builtin(name: &str) -> Option<FormDefinition> {
    match name {
        ENVIRONMENTAL_MONITORING => Some(environmental_monitoring()),
        WELL_EVALUATION => Some(well_evaluation()),
        _ => None,
    }
}

/// Environmental monitoring during well suspension and abandonment.
///
/// Every reviewed section needs an observation before submit.
pub fn environmental_monitoring() -> FormDefinition {
    FormDefinition::new(
        ENVIRONMENTAL_MONITORING,
        "Monitoreo Ambiental en la Suspensión y Abandono de Pozos",
    )
    .strict_observations(true)
    .section(
        SectionSchema::new("generalInfo", "Información General del Pozo").fields([
            FieldSchema::text("wellName").with_label("Nombre del Pozo"),
            FieldSchema::text("wellCode").with_label("Código del Pozo"),
            FieldSchema::location("location").with_label("Ubicación"),
            FieldSchema::text("fieldBlock").with_label("Campo / Bloque"),
            FieldSchema::text("operator").with_label("Operador"),
            FieldSchema::text("regulator").with_label("Entidad Reguladora"),
            FieldSchema::text("monitoringStartDate").with_label("Inicio del Monitoreo"),
            FieldSchema::text("monitoringEndDate").with_label("Fin del Monitoreo"),
            FieldSchema::text("wellStatus").with_label("Estado del Pozo"),
        ]),
    )
    .section(
        SectionSchema::new(
            "waterSoilParameters",
            "Parámetros de Calidad del Agua y Suelo",
        )
        .fields([
            FieldSchema::parameter("waterPh", "Escala pH").with_label("pH del Agua"),
            FieldSchema::parameter("electricalConductivity", "μS/cm")
                .with_label("Conductividad Eléctrica"),
            FieldSchema::parameter("hydrocarbonsInWater", "mg/L")
                .with_label("Presencia de Hidrocarburos en Agua"),
            FieldSchema::parameter("metalContaminants", "mg/L")
                .with_label("Contaminantes Metálicos en Agua"),
            FieldSchema::parameter("totalHydrocarbonsInSoil", "mg/Kg")
                .with_label("Hidrocarburos Totales en Suelo"),
            FieldSchema::parameter("volatileOrganicCompounds", "ppm")
                .with_label("Compuestos Orgánicos Volátiles"),
        ]),
    )
    .section(
        SectionSchema::new(
            "gasEmissions",
            "Registros de Emisiones de Gases y Contaminantes",
        )
        .fields([
            FieldSchema::parameter("co2Emission", "ppm").with_label("Emisión de CO2"),
            FieldSchema::parameter("ch4Emission", "ppm").with_label("Emisión de CH4"),
            FieldSchema::parameter("sulfurCompounds", "ppm")
                .with_label("Compuestos de Azufre (SOx)"),
            FieldSchema::parameter("nitrogenOxides", "ppm")
                .with_label("Óxidos de Nitrógeno (NOx)"),
            FieldSchema::parameter("suspendedParticles", "μg/m3")
                .with_label("Partículas Suspendidas (PM10, PM2.5)"),
        ]),
    )
    .section(
        SectionSchema::new("mitigationMeasures", "Medidas de Mitigación Implementadas").fields([
            FieldSchema::mitigation("atmosphericEmissionsControl")
                .with_label("Control de Emisiones Atmosféricas"),
            FieldSchema::mitigation("contaminatedWaterTreatment")
                .with_label("Tratamiento de Aguas Contaminadas"),
            FieldSchema::mitigation("soilRestoration").with_label("Restauración de Suelos"),
            FieldSchema::mitigation("hydrocarbonContainmentBarriers")
                .with_label("Barreras de Contención de Hidrocarburos"),
            FieldSchema::mitigation("areaRevegetation").with_label("Revegetación del Área"),
        ]),
    )
}

/// Technical evaluation of a well before abandonment.
///
/// Closes with free comments and a company sign-off; only the sign-off gates
/// submission.
pub fn well_evaluation() -> FormDefinition {
    FormDefinition::new(WELL_EVALUATION, "Evaluación de Pozo para Abandono")
        .closing(
            [FinalField::Comments, FinalField::Company, FinalField::Position],
            [FinalField::Company, FinalField::Position],
        )
        .section(SectionSchema::new("generalInfo", "Información General").fields([
            FieldSchema::text("wellName"),
            FieldSchema::text("location"),
            FieldSchema::text("operator"),
            FieldSchema::text("evaluationDate"),
        ]))
        .section(SectionSchema::new("wellStatus", "Estado del Pozo").fields([
            FieldSchema::text("totalDepth"),
            FieldSchema::text("wellType"),
            FieldSchema::text("currentStatus"),
            FieldSchema::text("currentPressure"),
        ]))
        .section(SectionSchema::new("riskAssessment", "Evaluación de Riesgos").fields([
            FieldSchema::text("residualHydrocarbons"),
            FieldSchema::text("casingCondition"),
            FieldSchema::text("cementCondition"),
            FieldSchema::text("environmentalRisk"),
        ]))
}
