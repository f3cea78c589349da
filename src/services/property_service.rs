// src/services/property_service.rs

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PropertyRepository,
    models::property::{ColorDescriptor, ImportSummary, MergeSummary, Property, PropertyValue},
};

// ---
// Pré-condições puras de agrupamento/merge
// ---
// Validadas ANTES de qualquer escrita: numa violação, nada muda no banco.

/// Agrupar `value` sob `target`. O conjunto de membros é plano (um nível):
/// rejeita auto-alvo, propriedade diferente, valor que já é grupo e alvo
/// que já é membro de outro grupo.
fn ensure_groupable(value: &PropertyValue, target: &PropertyValue) -> Result<(), AppError> {
    if value.id == target.id {
        return Err(AppError::SelfReference);
    }
    if value.property_id != target.property_id {
        return Err(AppError::CrossPropertyOperation);
    }
    if value.is_group {
        return Err(AppError::GroupValueCannotBeMember);
    }
    if target.group_value_id.is_some() {
        return Err(AppError::GroupTargetIsMember);
    }
    Ok(())
}

/// Merge de `source` em `target`: mesma propriedade, alvo diferente.
fn ensure_mergeable(source: &PropertyValue, target: &PropertyValue) -> Result<(), AppError> {
    if source.id == target.id {
        return Err(AppError::SelfReference);
    }
    if source.property_id != target.property_id {
        return Err(AppError::CrossPropertyOperation);
    }
    Ok(())
}

/// Ordem "agrupada" de exibição: a entrada vem na ordem natural (sort, id);
/// a saída mantém essa ordem, mas cada valor-grupo é seguido imediatamente
/// pelos seus membros. Valores avulsos ficam onde estavam. Membros cujo
/// grupo não está no conjunto aparecem na posição natural.
pub fn arrange_grouped(values: Vec<PropertyValue>) -> Vec<PropertyValue> {
    let present: HashSet<Uuid> = values.iter().map(|v| v.id).collect();

    // Membros indexados pelo grupo, preservando a ordem natural entre eles.
    let mut members: BTreeMap<Uuid, Vec<PropertyValue>> = BTreeMap::new();
    let mut heads: Vec<PropertyValue> = Vec::new();

    for value in values {
        match value.group_value_id {
            Some(group_id) if present.contains(&group_id) => {
                members.entry(group_id).or_default().push(value);
            }
            _ => heads.push(value),
        }
    }

    let mut out = Vec::with_capacity(heads.len());
    for head in heads {
        let head_id = head.id;
        out.push(head);
        if let Some(group_members) = members.remove(&head_id) {
            out.extend(group_members);
        }
    }
    // Sobras só existem em estado inconsistente (grupo que por sua vez é
    // membro); nenhum valor da entrada pode sumir da listagem.
    for (_, leftover) in members {
        out.extend(leftover);
    }
    out
}

/// Uma linha da importação em lote de valores.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValueImportRow {
    pub code: String,
    pub value: String,
    #[serde(default)]
    pub sort: i32,
    pub info_url: Option<String>,
    #[serde(default)]
    pub color: ColorDescriptor,
}

#[derive(Clone)]
pub struct PropertyService {
    property_repo: PropertyRepository,
    pool: PgPool,
}

impl PropertyService {
    pub fn new(property_repo: PropertyRepository, pool: PgPool) -> Self {
        Self { property_repo, pool }
    }

    // ---
    // Propriedades
    // ---

    pub async fn create_property(&self, code: &str, name: &str) -> Result<Property, AppError> {
        let mut tx = self.pool.begin().await?;
        let property = self.property_repo.create_property(&mut *tx, code, name).await?;
        tx.commit().await?;
        Ok(property)
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, AppError> {
        self.property_repo.list_properties(&self.pool).await
    }

    // ---
    // Valores
    // ---

    pub async fn create_value(
        &self,
        property_id: Uuid,
        code: &str,
        value: &str,
        sort: i32,
        info_url: Option<&str>,
        color: &ColorDescriptor,
    ) -> Result<PropertyValue, AppError> {
        let mut tx = self.pool.begin().await?;

        self.property_repo
            .find_property(&mut *tx, property_id)
            .await?
            .ok_or(AppError::EntityNotFound("Propriedade"))?;

        let created = self
            .property_repo
            .create_value(&mut *tx, property_id, code, value, sort, info_url, color)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Lista os valores de uma propriedade na ordem agrupada de exibição.
    pub async fn list_values_grouped(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PropertyValue>, AppError> {
        self.property_repo
            .find_property(&self.pool, property_id)
            .await?
            .ok_or(AppError::EntityNotFound("Propriedade"))?;

        let values = self.property_repo.list_values(&self.pool, property_id).await?;
        Ok(arrange_grouped(values))
    }

    // ---
    // Agrupamento
    // ---

    /// Torna `value_id` membro do grupo `target_id`. O alvo vira grupo se
    /// ainda não for. Reagrupar só move o ponteiro; o grupo anterior nunca é
    /// rebaixado automaticamente, mesmo que fique vazio.
    pub async fn group_into(
        &self,
        value_id: Uuid,
        target_id: Uuid,
    ) -> Result<PropertyValue, AppError> {
        let mut tx = self.pool.begin().await?;

        let value = self
            .property_repo
            .find_value_for_update(&mut tx, value_id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;
        let target = self
            .property_repo
            .find_value_for_update(&mut tx, target_id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;

        ensure_groupable(&value, &target)?;

        self.property_repo
            .set_group_pointer(&mut *tx, value.id, Some(target.id))
            .await?;
        if !target.is_group {
            self.property_repo.mark_as_group(&mut *tx, target.id).await?;
        }

        let updated = self
            .property_repo
            .find_value(&mut *tx, value.id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove o valor do grupo (volta a avulso). O grupo mantém a flag
    /// is_group mesmo que este fosse o último membro.
    pub async fn remove_from_group(&self, value_id: Uuid) -> Result<PropertyValue, AppError> {
        let mut tx = self.pool.begin().await?;

        let value = self
            .property_repo
            .find_value_for_update(&mut tx, value_id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;

        self.property_repo
            .set_group_pointer(&mut *tx, value.id, None)
            .await?;

        let updated = self
            .property_repo
            .find_value(&mut *tx, value.id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;

        tx.commit().await?;
        Ok(updated)
    }

    // ---
    // Merge
    // ---

    /// Consolidação destrutiva: reaponta toda referência de produto da
    /// origem para o alvo (deduplicando) e apaga a origem. Tudo numa
    /// transação: violação de pré-condição ou erro de banco desfaz tudo.
    pub async fn merge_into(
        &self,
        source_id: Uuid,
        target_id: Uuid,
    ) -> Result<MergeSummary, AppError> {
        let mut tx = self.pool.begin().await?;

        let source = self
            .property_repo
            .find_value_for_update(&mut tx, source_id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;
        let target = self
            .property_repo
            .find_value_for_update(&mut tx, target_id)
            .await?
            .ok_or(AppError::PropertyValueNotFound)?;

        ensure_mergeable(&source, &target)?;

        // As duplicatas que sobram contam como "reapontadas": a referência
        // já existe no alvo.
        let moved = self
            .property_repo
            .relink_product_refs(&mut tx, source.id, target.id)
            .await?;
        let dropped_duplicates = self.property_repo.drop_source_refs(&mut tx, source.id).await?;

        self.property_repo.delete_value(&mut *tx, source.id).await?;

        tx.commit().await?;

        tracing::info!(
            source = %source.id,
            target = %target.id,
            relinked = moved + dropped_duplicates,
            "merge de valores de propriedade concluído"
        );

        Ok(MergeSummary { relinked: moved + dropped_duplicates, deleted: 1 })
    }

    // ---
    // Importação em lote
    // ---

    /// Carregador simples: insere as linhas válidas, pula códigos já usados
    /// e conta como erro linhas sem código/valor. Os inserts rodam numa
    /// transação só.
    pub async fn import_values(
        &self,
        property_id: Uuid,
        rows: &[ValueImportRow],
    ) -> Result<ImportSummary, AppError> {
        let mut tx = self.pool.begin().await?;

        self.property_repo
            .find_property(&mut *tx, property_id)
            .await?
            .ok_or(AppError::EntityNotFound("Propriedade"))?;

        let mut seen: HashSet<String> = self
            .property_repo
            .list_value_codes(&mut *tx, property_id)
            .await?
            .into_iter()
            .collect();

        let mut summary = ImportSummary::default();
        for row in rows {
            if row.code.trim().is_empty() || row.value.trim().is_empty() {
                summary.errored += 1;
                continue;
            }
            if seen.contains(&row.code) {
                summary.skipped += 1;
                continue;
            }
            self.property_repo
                .create_value(
                    &mut *tx,
                    property_id,
                    &row.code,
                    &row.value,
                    row.sort,
                    row.info_url.as_deref(),
                    &row.color,
                )
                .await?;
            seen.insert(row.code.clone());
            summary.inserted += 1;
        }

        tx.commit().await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn value(property: Uuid, sort: i32, group: Option<Uuid>, is_group: bool) -> PropertyValue {
        PropertyValue {
            id: Uuid::new_v4(),
            property_id: property,
            code: format!("v{sort}"),
            value: format!("Valor {sort}"),
            sort,
            info_url: None,
            color: Json(ColorDescriptor::None),
            is_group,
            group_value_id: group,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn agrupar_rejeita_auto_alvo() {
        let p = Uuid::new_v4();
        let v = value(p, 1, None, false);
        assert!(matches!(ensure_groupable(&v, &v), Err(AppError::SelfReference)));
    }

    #[test]
    fn agrupar_rejeita_propriedade_diferente() {
        let v = value(Uuid::new_v4(), 1, None, false);
        let t = value(Uuid::new_v4(), 2, None, false);
        assert!(matches!(
            ensure_groupable(&v, &t),
            Err(AppError::CrossPropertyOperation)
        ));
    }

    #[test]
    fn agrupar_rejeita_alvo_que_e_membro() {
        let p = Uuid::new_v4();
        let group = value(p, 1, None, true);
        let member = value(p, 2, Some(group.id), false);
        let v = value(p, 3, None, false);
        assert!(matches!(
            ensure_groupable(&v, &member),
            Err(AppError::GroupTargetIsMember)
        ));
    }

    #[test]
    fn agrupar_rejeita_valor_que_ja_e_grupo() {
        let p = Uuid::new_v4();
        let group = value(p, 1, None, true);
        let target = value(p, 2, None, false);
        assert!(matches!(
            ensure_groupable(&group, &target),
            Err(AppError::GroupValueCannotBeMember)
        ));
    }

    #[test]
    fn reagrupar_membro_move_o_ponteiro_sem_rebaixar_o_grupo_antigo() {
        let p = Uuid::new_v4();
        let group_a = value(p, 1, None, true);
        let group_b = value(p, 2, None, true);
        let member = value(p, 3, Some(group_a.id), false);

        // Membro de A pode ser reagrupado sob B.
        assert!(ensure_groupable(&member, &group_b).is_ok());

        // Depois do reagrupamento, A continua grupo (vazio) na listagem e o
        // membro aparece contíguo a B.
        let mut moved = member.clone();
        moved.group_value_id = Some(group_b.id);
        let out = arrange_grouped(vec![group_a.clone(), group_b.clone(), moved.clone()]);
        let ids: Vec<Uuid> = out.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![group_a.id, group_b.id, moved.id]);
    }

    #[test]
    fn agrupar_aceita_alvo_valido() {
        let p = Uuid::new_v4();
        let v = value(p, 1, None, false);
        let t = value(p, 2, None, false);
        assert!(ensure_groupable(&v, &t).is_ok());
    }

    #[test]
    fn merge_rejeita_propriedade_diferente() {
        let s = value(Uuid::new_v4(), 1, None, false);
        let t = value(Uuid::new_v4(), 2, None, false);
        assert!(matches!(
            ensure_mergeable(&s, &t),
            Err(AppError::CrossPropertyOperation)
        ));
    }

    #[test]
    fn ordem_agrupada_mantem_membros_contiguos() {
        let p = Uuid::new_v4();
        let group_a = value(p, 1, None, true);
        let solo = value(p, 2, None, false);
        let member_a1 = value(p, 3, Some(group_a.id), false);
        let member_a2 = value(p, 5, Some(group_a.id), false);
        let group_b = value(p, 4, None, true);
        let member_b1 = value(p, 6, Some(group_b.id), false);

        // Entrada na ordem natural (sort).
        let input = vec![
            group_a.clone(),
            solo.clone(),
            member_a1.clone(),
            group_b.clone(),
            member_a2.clone(),
            member_b1.clone(),
        ];
        let out = arrange_grouped(input);
        let ids: Vec<Uuid> = out.iter().map(|v| v.id).collect();

        assert_eq!(
            ids,
            vec![group_a.id, member_a1.id, member_a2.id, solo.id, group_b.id, member_b1.id]
        );
    }

    #[test]
    fn ordem_agrupada_sem_grupos_e_a_natural() {
        let p = Uuid::new_v4();
        let a = value(p, 1, None, false);
        let b = value(p, 2, None, false);
        let input = vec![a.clone(), b.clone()];
        let out = arrange_grouped(input);
        assert_eq!(out[0].id, a.id);
        assert_eq!(out[1].id, b.id);
    }

    #[test]
    fn membro_de_grupo_ausente_fica_na_posicao_natural() {
        let p = Uuid::new_v4();
        let fora_do_conjunto = Uuid::new_v4();
        let a = value(p, 1, Some(fora_do_conjunto), false);
        let b = value(p, 2, None, false);
        let out = arrange_grouped(vec![a.clone(), b.clone()]);
        assert_eq!(out[0].id, a.id);
        assert_eq!(out[1].id, b.id);
    }

    #[test]
    fn ordem_agrupada_nao_perde_valores_com_aninhamento_residual() {
        let p = Uuid::new_v4();
        // Estado inconsistente: X é grupo E membro de Y; B é membro de X.
        let group_y = value(p, 1, None, true);
        let group_x = value(p, 2, Some(group_y.id), true);
        let member_b = value(p, 3, Some(group_x.id), false);

        let out = arrange_grouped(vec![group_y.clone(), group_x.clone(), member_b.clone()]);
        assert_eq!(out.len(), 3);
        assert!(out.iter().any(|v| v.id == member_b.id));
    }

    #[test]
    fn grupo_vazio_permanece_na_lista() {
        let p = Uuid::new_v4();
        // Grupo sem membros (is_group true): segue listado normalmente.
        let g = value(p, 1, None, true);
        let b = value(p, 2, None, false);
        let out = arrange_grouped(vec![g.clone(), b.clone()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, g.id);
    }
}
