//! Schema fixtures.

use edmgen::config::GenerationConfig;
use edmgen::resolve::{ResolvedModel, resolve};
use edmgen::schema::raw::{
    RawComplexType, RawEntityType, RawEnumType, RawNavigation, RawProperty, RawSchema, SchemaTree,
};

/// A small two-namespace sales model.
///
/// `Sales.Item` and `Stock.Item` collide on their local name.
pub fn sales_tree() -> SchemaTree {
    SchemaTree::new()
        .with_schema(
            RawSchema::new("com.acme.sales")
                .with_alias("Sales")
                .with_entity(
                    RawEntityType::new("Order")
                        .with_key("ID")
                        .with_property(RawProperty::new("ID", "Edm.Int32").not_nullable())
                        .with_property(RawProperty::new("Placed", "Edm.DateTimeOffset"))
                        .with_property(RawProperty::new("Total", "Edm.Decimal"))
                        .with_property(RawProperty::new("Status", "Sales.Status"))
                        .with_property(RawProperty::new("ShipTo", "Sales.Address"))
                        .with_navigation(RawNavigation::typed("Items", "Collection(Sales.Item)"))
                        .with_navigation(
                            RawNavigation::typed("Previous", "Sales.Order").with_partner("Next"),
                        ),
                )
                .with_entity(
                    RawEntityType::new("Item")
                        .with_key("Sku")
                        .with_property(RawProperty::new("Sku", "Edm.String").not_nullable())
                        .with_property(RawProperty::new("Stock", "com.acme.stock.Item")),
                )
                .with_complex(
                    RawComplexType::new("Address")
                        .with_property(RawProperty::new("Street", "Edm.String"))
                        .with_property(RawProperty::new("Tags", "Collection(Edm.String)")),
                )
                .with_enum(
                    RawEnumType::new("Status")
                        .with_member("Open")
                        .with_member_value("Closed", "5")
                        .with_member("Cancelled"),
                ),
        )
        .with_schema(
            RawSchema::new("com.acme.stock").with_entity(
                RawEntityType::new("Item")
                    .with_key("ID")
                    .with_property(RawProperty::new("ID", "Edm.Guid").not_nullable())
                    .with_property(RawProperty::new("Count", "Edm.Int64")),
            ),
        )
}

pub fn resolve_default(tree: &SchemaTree) -> ResolvedModel {
    resolve(tree, &GenerationConfig::default()).expect("fixture should resolve")
}

/// An OData v4 `$metadata` document.
pub const V4_METADATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:Reference Uri="https://oasis-tcs.github.io/odata-vocabularies/vocabularies/Org.OData.Core.V1.xml">
    <edmx:Include Namespace="Org.OData.Core.V1" Alias="Core"/>
  </edmx:Reference>
  <edmx:DataServices>
    <Schema Namespace="Trippin" Alias="T" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EnumType Name="PersonGender">
        <Member Name="Male" Value="0"/>
        <Member Name="Female" Value="1"/>
        <Member Name="Unknown" Value="2"/>
      </EnumType>
      <EnumType Name="Feature" IsFlags="true" UnderlyingType="Edm.Int64">
        <Member Name="Feature1" Value="1"/>
        <Member Name="Feature2" Value="2"/>
        <Member Name="Feature3" Value="4"/>
      </EnumType>
      <ComplexType Name="Location">
        <Property Name="Address" Type="Edm.String"/>
        <Property Name="City" Type="T.City"/>
      </ComplexType>
      <ComplexType Name="City">
        <Property Name="Name" Type="Edm.String"/>
        <Property Name="Region" Type="Edm.String"/>
      </ComplexType>
      <EntityType Name="Person">
        <Key><PropertyRef Name="UserName"/></Key>
        <Property Name="UserName" Type="Edm.String" Nullable="false"/>
        <Property Name="Age" Type="Edm.Int64"/>
        <Property Name="Gender" Type="T.PersonGender" Nullable="false"/>
        <Property Name="Features" Type="Collection(T.Feature)"/>
        <Property Name="AddressInfo" Type="Collection(T.Location)"/>
        <Property Name="Home" Type="Edm.GeographyPoint"/>
        <NavigationProperty Name="Friends" Type="Collection(T.Person)"/>
        <NavigationProperty Name="BestFriend" Type="T.Person" Nullable="true"/>
        <NavigationProperty Name="Trips" Type="Collection(T.Trip)" Partner="Traveller"/>
      </EntityType>
      <EntityType Name="Trip">
        <Key><PropertyRef Name="TripId"/></Key>
        <Property Name="TripId" Type="Edm.Int32" Nullable="false"/>
        <Property Name="Budget" Type="Edm.Single" Nullable="false"/>
        <Property Name="Duration" Type="Edm.Duration"/>
        <NavigationProperty Name="Traveller" Type="T.Person" Partner="Trips"/>
        <Annotation Term="Core.Description" String="A trip"/>
      </EntityType>
      <EntityContainer Name="Container">
        <EntitySet Name="People" EntityType="T.Person"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>
"#;

/// An OData v3 `$metadata` document using associations.
pub const V3_METADATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="1.0" xmlns:edmx="http://schemas.microsoft.com/ado/2007/06/edmx">
  <edmx:DataServices m:DataServiceVersion="3.0" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
    <Schema Namespace="NorthwindModel" xmlns="http://schemas.microsoft.com/ado/2009/11/edm">
      <EntityType Name="Category">
        <Key><PropertyRef Name="CategoryID"/></Key>
        <Property Name="CategoryID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="CategoryName" Type="Edm.String" Nullable="false" MaxLength="15"/>
        <Property Name="Picture" Type="Edm.Binary"/>
        <NavigationProperty Name="Products" Relationship="NorthwindModel.FK_Products_Categories" FromRole="Categories" ToRole="Products"/>
      </EntityType>
      <EntityType Name="Product">
        <Key><PropertyRef Name="ProductID"/></Key>
        <Property Name="ProductID" Type="Edm.Int32" Nullable="false"/>
        <Property Name="UnitPrice" Type="Edm.Decimal" Precision="19" Scale="4"/>
        <Property Name="Discontinued" Type="Edm.Boolean" Nullable="false"/>
        <Property Name="Modified" Type="Edm.DateTime"/>
        <NavigationProperty Name="Category" Relationship="NorthwindModel.FK_Products_Categories" FromRole="Products" ToRole="Categories"/>
      </EntityType>
      <Association Name="FK_Products_Categories">
        <End Role="Categories" Type="NorthwindModel.Category" Multiplicity="0..1"/>
        <End Role="Products" Type="NorthwindModel.Product" Multiplicity="*"/>
        <ReferentialConstraint>
          <Principal Role="Categories"><PropertyRef Name="CategoryID"/></Principal>
          <Dependent Role="Products"><PropertyRef Name="CategoryID"/></Dependent>
        </ReferentialConstraint>
      </Association>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>
"#;
