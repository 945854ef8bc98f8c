use crate::domain::model::{Record, Row};
use std::collections::BTreeMap;

/// Target column -> source field, in the column order of the `sell_out` table.
pub const SELL_OUT_MAPPING: &[(&str, &str)] = &[
    ("segmento", "SEGMENT3"),
    ("tipo_documento", "Tipo Documento"),
    ("segmentos_concatenados", "CONCAT_SEGMENTS"),
    ("descripcion", "DESCRIPTION"),
    ("nombre", "NAME"),
    ("sucursal", "Sucursal"),
    ("cliente_bandera", "Clientes Carrito Flag"),
    ("tipo_pedido", "TIPO_PEDIDO"),
    ("cadena_desc", "CADENA_DESC"),
    ("deposito", "DEPOSITO"),
    ("cliente", "PARTY_NAME"),
    ("numero_cliente", "PARTY_NUMBER"),
    ("tipo_cuenta", "Tipo Cuenta"),
    ("canal", "Canal"),
    ("perfil_nivel_cuenta", "Perfil Nivel Cuenta"),
    ("cadena", "Cadena"),
    ("numero_cuenta", "ACCOUNT_NUMBER"),
    ("cuenta", "Cuenta"),
    ("lista_precio", "LISTA_PRECIOS"),
    ("laboratorio", "Laboratorio"),
    ("division", "División"),
    ("codigo_producto", "Producto Código"),
    ("producto", "Producto"),
    ("comprador", "Comprador"),
    ("ffs", "Fee for Service"),
    ("fecha", "Fecha"),
    ("piezas_factura", "Pzas Facturadas"),
    ("venta_neta", "Venta neta"),
    ("segmento_4", "SEGMENT4"),
    ("significado", "MEANING"),
    ("numero_pedido", "Numero Pedido"),
    ("oferta", "Oferta"),
    ("oferta_factura", "Oferta Factura"),
    ("descuento_factura", "Descuento Factura"),
    ("costo_promedio", "Costo Promedio"),
    ("trx_numero", "TRX_NUMBER"),
    ("ean", "EAN"),
    ("validacion_cliente", "Validacion Cliente"),
    ("llave", "Llave"),
    ("cap", "CAP"),
    ("oferta_calculada", "OFERTA"),
    ("valor_valuacion", "Valor Tipo de Valuacion"),
    ("tipo_valuacion", "Tipo de Valuacion"),
    ("tipo_condicion", "Tipo condicion costo"),
    ("total_valuacion", "Costo Total"),
    ("valor_cap", "Valor CAP"),
    ("costo_con_cap", "Costo con CAP"),
    ("valor_oferta", "Valor Oferta"),
    ("total_beneficio", "Total Beneficio"),
];

/// Renames source fields to target columns. Values are copied as-is; a
/// missing source field leaves the column absent.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    columns: Vec<(String, String)>,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self {
            columns: SELL_OUT_MAPPING
                .iter()
                .map(|(target, source)| (target.to_string(), source.to_string()))
                .collect(),
        }
    }
}

impl FieldMapper {
    /// The built-in table with `overrides` applied. An override for a known
    /// column replaces its source field; unknown columns are appended.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut mapper = Self::default();
        for (target, source) in overrides {
            match mapper.columns.iter_mut().find(|(t, _)| t == target) {
                Some(entry) => {
                    tracing::debug!("Column '{}' now reads '{}' (was '{}')", target, source, entry.1);
                    entry.1 = source.clone();
                }
                None => {
                    tracing::debug!("Adding column '{}' from '{}'", target, source);
                    mapper.columns.push((target.clone(), source.clone()));
                }
            }
        }
        mapper
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(t, s)| (t.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn map_record(&self, record: &Record) -> Row {
        let mut row = Row::with_capacity(self.columns.len());
        for (target, source) in &self.columns {
            row.push(target.as_str(), record.get(source).cloned());
        }
        row
    }

    pub fn map_all(&self, records: &[Record]) -> Vec<Row> {
        records.iter().map(|record| self.map_record(record)).collect()
    }
}
